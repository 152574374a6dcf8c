//! The entity cache
//!
//! Flat sharded maps keyed by snowflake, with cross-entity relationships as
//! id references. Users are shared between guilds and DM channels and carry
//! a reference count: one per owning relationship. A user is resident iff
//! its count is positive.

use dashmap::DashMap;
use ripple_core::{Channel, Guild, Message, Snowflake, User};

use super::MessageStore;

/// A cached user together with its owning-reference count
struct UserSlot {
    user: User,
    refs: usize,
}

/// Sharded in-memory storage for guilds, channels, users, and messages
///
/// The whole cache is replaced atomically at session establishment; within a
/// session every mutation goes through the single ordered dispatch path.
pub struct EntityCache {
    guilds: DashMap<Snowflake, Guild>,
    channels: DashMap<Snowflake, Channel>,
    users: DashMap<Snowflake, UserSlot>,
    messages: MessageStore,
}

impl EntityCache {
    /// Create an empty cache
    #[must_use]
    pub fn new(message_cache_size: usize) -> Self {
        Self::with_capacity(0, 0, message_cache_size)
    }

    /// Create a cache pre-sized from the counts advertised in a
    /// session-ready snapshot
    #[must_use]
    pub fn with_capacity(
        guild_count: usize,
        dm_channel_count: usize,
        message_cache_size: usize,
    ) -> Self {
        Self {
            guilds: DashMap::with_capacity(guild_count),
            channels: DashMap::with_capacity(guild_count * 2 + dm_channel_count),
            users: DashMap::with_capacity(dm_channel_count),
            messages: MessageStore::new(message_cache_size),
        }
    }

    // === Guilds ===

    /// Look up a guild by id
    pub fn guild(&self, guild_id: Snowflake) -> Option<Guild> {
        self.guilds.get(&guild_id).map(|g| g.clone())
    }

    /// Snapshot of every cached guild
    #[must_use]
    pub fn guilds(&self) -> Vec<Guild> {
        self.guilds.iter().map(|g| g.clone()).collect()
    }

    /// Insert a guild record
    ///
    /// Channels and members are attached separately so that their ownership
    /// bookkeeping runs through the cache. Replacing an already-cached guild
    /// releases the displaced member set first; the fresh payload re-attaches
    /// its members and acquires new references.
    pub fn insert_guild(&self, guild: Guild) {
        if let Some(displaced) = self.guilds.insert(guild.id, guild) {
            for member_id in &displaced.members {
                self.release_user(*member_id);
            }
        }
    }

    /// Mutate a guild in place, returning the updated copy
    pub fn update_guild<F>(&self, guild_id: Snowflake, f: F) -> Option<Guild>
    where
        F: FnOnce(&mut Guild),
    {
        let mut guild = self.guilds.get_mut(&guild_id)?;
        f(&mut guild);
        Some(guild.clone())
    }

    /// Remove a guild, cascading: its channels (and their messages) are
    /// dropped and every member's reference count is decremented once.
    pub fn remove_guild(&self, guild_id: Snowflake) -> Option<Guild> {
        let (_, guild) = self.guilds.remove(&guild_id)?;

        for channel_id in &guild.channels {
            self.channels.remove(channel_id);
            self.messages.remove_channel(*channel_id);
        }
        for member_id in &guild.members {
            self.release_user(*member_id);
        }

        tracing::debug!(
            guild_id = %guild_id,
            channels = guild.channels.len(),
            members = guild.members.len(),
            "Guild removed from cache"
        );

        Some(guild)
    }

    // === Channels ===

    /// Look up a channel by id
    pub fn channel(&self, channel_id: Snowflake) -> Option<Channel> {
        self.channels.get(&channel_id).map(|c| c.clone())
    }

    /// Attach a guild channel to its owning guild
    ///
    /// Returns None when the owning guild is not cached.
    pub fn add_guild_channel(&self, channel: Channel) -> Option<Channel> {
        let guild_id = channel.guild_id?;
        {
            let mut guild = self.guilds.get_mut(&guild_id)?;
            guild.add_channel(channel.id);
        }
        self.channels.insert(channel.id, channel.clone());
        Some(channel)
    }

    /// Attach a DM channel, acquiring an owning reference on its recipient
    pub fn add_dm_channel(&self, channel: Channel, recipient: User) -> Channel {
        self.get_or_add_user(recipient);
        self.channels.insert(channel.id, channel.clone());
        channel
    }

    /// Mutate a channel in place, returning the updated copy
    pub fn update_channel<F>(&self, channel_id: Snowflake, f: F) -> Option<Channel>
    where
        F: FnOnce(&mut Channel),
    {
        let mut channel = self.channels.get_mut(&channel_id)?;
        f(&mut channel);
        Some(channel.clone())
    }

    /// Remove a channel with its ownership cascade: a guild channel is
    /// detached from its guild, a DM channel releases its recipient.
    pub fn remove_channel(&self, channel_id: Snowflake) -> Option<Channel> {
        let (_, channel) = self.channels.remove(&channel_id)?;
        self.messages.remove_channel(channel_id);

        if let Some(guild_id) = channel.guild_id {
            if let Some(mut guild) = self.guilds.get_mut(&guild_id) {
                guild.remove_channel(channel_id);
            }
        } else if let Some(recipient_id) = channel.recipient_id {
            self.release_user(recipient_id);
        }

        Some(channel)
    }

    // === Users ===

    /// Look up a user by id
    pub fn user(&self, user_id: Snowflake) -> Option<User> {
        self.users.get(&user_id).map(|slot| slot.user.clone())
    }

    /// Look up a user by username and discriminator
    pub fn user_by_tag(&self, username: &str, discriminator: &str) -> Option<User> {
        self.users
            .iter()
            .find(|slot| {
                slot.user.username == username && slot.user.discriminator == discriminator
            })
            .map(|slot| slot.user.clone())
    }

    /// Get or create a user, acquiring one owning reference
    ///
    /// Must be paired with [`EntityCache::release_user`].
    pub fn get_or_add_user(&self, user: User) -> User {
        let mut slot = self
            .users
            .entry(user.id)
            .or_insert_with(|| UserSlot { user, refs: 0 });
        slot.refs += 1;
        slot.user.clone()
    }

    /// Release one owning reference; the user is removed from the cache
    /// exactly when the count reaches zero.
    pub fn release_user(&self, user_id: Snowflake) -> Option<User> {
        let user = {
            let mut slot = self.users.get_mut(&user_id)?;
            slot.refs = slot.refs.saturating_sub(1);
            slot.user.clone()
        };
        self.users.remove_if(&user_id, |_, slot| slot.refs == 0);
        Some(user)
    }

    /// Mutate a user in place, returning the updated copy
    pub fn update_user<F>(&self, user_id: Snowflake, f: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let mut slot = self.users.get_mut(&user_id)?;
        f(&mut slot.user);
        Some(slot.user.clone())
    }

    /// Current reference count for a user (0 if not cached)
    #[must_use]
    pub fn user_ref_count(&self, user_id: Snowflake) -> usize {
        self.users.get(&user_id).map_or(0, |slot| slot.refs)
    }

    // === Members ===

    /// Add a user as a member of a guild
    ///
    /// Acquires an owning reference only when the membership is new; a
    /// re-delivered member refreshes the cached user fields instead.
    /// Returns None when the guild is not cached.
    pub fn add_member(&self, guild_id: Snowflake, user: User) -> Option<User> {
        let is_new = {
            let mut guild = self.guilds.get_mut(&guild_id)?;
            guild.add_member(user.id)
        };

        if is_new {
            Some(self.get_or_add_user(user))
        } else {
            let user_id = user.id;
            self.update_user(user_id, |u| *u = user)
        }
    }

    /// Remove a user's membership of a guild, releasing one reference
    pub fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<User> {
        let removed = {
            let mut guild = self.guilds.get_mut(&guild_id)?;
            guild.remove_member(user_id)
        };
        if removed {
            self.release_user(user_id)
        } else {
            None
        }
    }

    // === Messages ===

    /// Look up a cached message
    pub fn message(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<Message> {
        self.messages.get(channel_id, message_id)
    }

    /// Cache a message in its channel's bounded buffer
    pub fn add_message(&self, message: Message) {
        self.messages.add(message);
    }

    /// Mutate a cached message in place, returning the updated copy
    pub fn update_message<F>(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        f: F,
    ) -> Option<Message>
    where
        F: FnOnce(&mut Message),
    {
        self.messages.update(channel_id, message_id, f)
    }

    /// Remove a cached message
    pub fn remove_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<Message> {
        self.messages.remove(channel_id, message_id)
    }

    // === Counts ===

    /// Number of cached guilds
    #[must_use]
    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    /// Number of cached channels
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of cached users
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new(100)
    }
}

impl std::fmt::Debug for EntityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCache")
            .field("guilds", &self.guilds.len())
            .field("channels", &self.channels.len())
            .field("users", &self.users.len())
            .finish()
    }
}
