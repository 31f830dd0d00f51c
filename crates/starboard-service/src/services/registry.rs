//! Configuration registry
//!
//! The in-memory list of starboards. Lookups hand out clones; the engine
//! never holds a reference into the registry across an await.

use parking_lot::RwLock;

use starboard_core::traits::ConfigRecord;
use starboard_core::{DomainError, Emoji, Snowflake, StarboardConfig, StarboardOptionsPatch};

/// Registry of configured starboards
#[derive(Debug, Default)]
pub struct StarboardRegistry {
    configs: RwLock<Vec<StarboardConfig>>,
}

impl StarboardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole registry (used when loading from the store)
    pub fn replace_all(&self, configs: Vec<StarboardConfig>) {
        *self.configs.write() = configs;
    }

    /// First starboard of `guild_id` using `emoji`
    pub fn find_by_guild_and_emoji(
        &self,
        guild_id: Snowflake,
        emoji: &Emoji,
    ) -> Option<StarboardConfig> {
        self.configs
            .read()
            .iter()
            .find(|c| c.guild_id == guild_id && c.emoji() == emoji)
            .cloned()
    }

    pub fn find_by_channel_and_emoji(
        &self,
        channel_id: Snowflake,
        emoji: &Emoji,
    ) -> Option<StarboardConfig> {
        self.configs
            .read()
            .iter()
            .find(|c| c.is(channel_id, emoji))
            .cloned()
    }

    /// Every starboard of a guild
    pub fn for_guild(&self, guild_id: Snowflake) -> Vec<StarboardConfig> {
        self.configs
            .read()
            .iter()
            .filter(|c| c.guild_id == guild_id)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<StarboardConfig> {
        self.configs.read().clone()
    }

    pub fn len(&self) -> usize {
        self.configs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }

    /// Snapshot in persisted form
    pub fn records(&self) -> Vec<ConfigRecord> {
        self.configs.read().iter().map(ConfigRecord::from).collect()
    }

    /// Add a starboard; (channel, emoji) must be unused
    pub fn add(&self, config: StarboardConfig) -> Result<(), DomainError> {
        let mut configs = self.configs.write();
        if configs.iter().any(|c| c.is(config.channel_id, config.emoji())) {
            return Err(DomainError::DuplicateConfig {
                channel_id: config.channel_id,
                emoji: config.emoji().clone(),
            });
        }
        configs.push(config);
        Ok(())
    }

    /// Remove and return the starboard on (channel, emoji)
    pub fn remove(&self, channel_id: Snowflake, emoji: &Emoji) -> Result<StarboardConfig, DomainError> {
        let mut configs = self.configs.write();
        let position = configs
            .iter()
            .position(|c| c.is(channel_id, emoji))
            .ok_or_else(|| DomainError::ConfigNotFound {
                channel_id,
                emoji: emoji.clone(),
            })?;
        Ok(configs.remove(position))
    }

    /// Apply `patch` to the starboard on (channel, emoji); returns (old, new)
    ///
    /// The edited options are validated before they replace the old ones.
    pub fn edit(
        &self,
        channel_id: Snowflake,
        emoji: &Emoji,
        patch: StarboardOptionsPatch,
    ) -> Result<(StarboardConfig, StarboardConfig), DomainError> {
        let mut configs = self.configs.write();
        let slot = configs
            .iter_mut()
            .find(|c| c.is(channel_id, emoji))
            .ok_or_else(|| DomainError::ConfigNotFound {
                channel_id,
                emoji: emoji.clone(),
            })?;

        let old = slot.clone();
        let mut new = old.clone();
        new.options.apply(patch);
        new.options.validate_options()?;

        *slot = new.clone();
        Ok((old, new))
    }

    /// Put back a previously edited or removed starboard
    pub fn restore(&self, config: StarboardConfig) {
        let mut configs = self.configs.write();
        match configs
            .iter_mut()
            .find(|c| c.is(config.channel_id, config.emoji()))
        {
            Some(slot) => *slot = config,
            None => configs.push(config),
        }
    }

    /// Remove every starboard posting into `channel_id`
    pub fn remove_channel(&self, channel_id: Snowflake) -> Vec<StarboardConfig> {
        let mut configs = self.configs.write();
        let (removed, kept) = configs
            .drain(..)
            .partition(|c: &StarboardConfig| c.channel_id == channel_id);
        *configs = kept;
        removed
    }
}
