//! Guild entity - a server mirrored from the gateway
//!
//! Cross-entity relationships are id references only; the cache owns all
//! creation and removal so refcount bookkeeping cannot be bypassed.

use std::collections::{HashMap, HashSet};

use crate::entities::Role;
use crate::value_objects::Snowflake;

/// Guild (server) entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    /// Large guilds do not send their full member list at session start
    pub large: bool,
    /// Set while the server reports the guild as unavailable
    pub unavailable: bool,
    /// Member count advertised by the server
    pub member_count: usize,
    /// Members actually loaded into the cache so far
    pub downloaded_member_count: usize,
    /// Channels owned by this guild
    pub channels: HashSet<Snowflake>,
    /// Users that are members of this guild
    pub members: HashSet<Snowflake>,
    /// Roles defined on this guild
    pub roles: HashMap<Snowflake, Role>,
}

impl Guild {
    /// Create a new Guild
    #[must_use]
    pub fn new(id: Snowflake, name: String) -> Self {
        Self {
            id,
            name,
            large: false,
            unavailable: false,
            member_count: 0,
            downloaded_member_count: 0,
            channels: HashSet::new(),
            members: HashSet::new(),
            roles: HashMap::new(),
        }
    }

    /// Check whether every advertised member has been loaded
    #[inline]
    #[must_use]
    pub fn has_all_members(&self) -> bool {
        self.downloaded_member_count >= self.member_count
    }

    /// Attach a channel to this guild
    pub fn add_channel(&mut self, channel_id: Snowflake) {
        self.channels.insert(channel_id);
    }

    /// Detach a channel from this guild
    pub fn remove_channel(&mut self, channel_id: Snowflake) -> bool {
        self.channels.remove(&channel_id)
    }

    /// Record a member, returning false if already present
    pub fn add_member(&mut self, user_id: Snowflake) -> bool {
        let added = self.members.insert(user_id);
        if added {
            self.downloaded_member_count += 1;
        }
        added
    }

    /// Forget a member, returning false if not present
    pub fn remove_member(&mut self, user_id: Snowflake) -> bool {
        let removed = self.members.remove(&user_id);
        if removed {
            self.downloaded_member_count = self.downloaded_member_count.saturating_sub(1);
        }
        removed
    }

    /// Look up a role by id
    #[must_use]
    pub fn role(&self, role_id: Snowflake) -> Option<&Role> {
        self.roles.get(&role_id)
    }

    /// Insert or replace a role
    pub fn add_role(&mut self, role: Role) {
        self.roles.insert(role.id, role);
    }

    /// Remove a role by id
    pub fn remove_role(&mut self, role_id: Snowflake) -> Option<Role> {
        self.roles.remove(&role_id)
    }

    /// Update the guild name
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
