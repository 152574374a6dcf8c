//! Cached user.
//!
//! A single user object is shared by every guild membership and DM
//! channel that references it; the cache keeps a reference count and
//! drops the user when the last holder goes away.

use crate::value_objects::Snowflake;

/// A user as mirrored from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
}

impl User {
    #[must_use]
    pub fn new(id: Snowflake, username: String, discriminator: String) -> Self {
        Self {
            id,
            username,
            discriminator,
        }
    }

    /// Full `username#discriminator` tag.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    pub fn set_username(&mut self, username: String) {
        self.username = username;
    }

    pub fn set_discriminator(&mut self, discriminator: String) {
        self.discriminator = discriminator;
    }
}
