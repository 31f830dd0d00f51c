//! Persistent configuration store port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{StarboardConfig, StarboardOptions};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// One persisted starboard: `{ channelId, guildId, options }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub channel_id: Snowflake,
    pub guild_id: Snowflake,
    pub options: StarboardOptions,
}

impl From<&StarboardConfig> for ConfigRecord {
    fn from(config: &StarboardConfig) -> Self {
        Self {
            channel_id: config.channel_id,
            guild_id: config.guild_id,
            options: config.options.clone(),
        }
    }
}

impl From<ConfigRecord> for StarboardConfig {
    fn from(record: ConfigRecord) -> Self {
        StarboardConfig::new(record.guild_id, record.channel_id, record.options)
    }
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load every persisted starboard
    async fn load_all(&self) -> RepoResult<Vec<ConfigRecord>>;

    /// Replace the persisted set with `records`
    async fn save_all(&self, records: &[ConfigRecord]) -> RepoResult<()>;
}
