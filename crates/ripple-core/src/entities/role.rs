//! Guild role.

use crate::value_objects::Snowflake;

/// A named role inside a guild.
///
/// The client only mirrors what role events deliver; permission
/// resolution happens server side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    /// Position in the guild's role list, higher sorts first.
    pub position: i32,
}

impl Role {
    #[must_use]
    pub fn new(id: Snowflake, guild_id: Snowflake, name: String) -> Self {
        Self {
            id,
            guild_id,
            name,
            position: 0,
        }
    }
}
