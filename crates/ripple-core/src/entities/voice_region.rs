//! Voice region - a named server region advertised by the platform

use serde::{Deserialize, Serialize};

/// Voice region entity
///
/// Fetched once at login over the REST collaborator and looked up by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceRegion {
    pub id: String,
    pub name: String,
}

impl VoiceRegion {
    /// Create a new VoiceRegion
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
