//! Channel entity

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild text channel as seen by the starboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
}

impl Channel {
    /// Create a new guild text channel
    #[must_use]
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
            name: Some(name.into()),
            nsfw: false,
        }
    }

    /// Mark the channel age-restricted
    #[must_use]
    pub fn nsfw(mut self) -> Self {
        self.nsfw = true;
        self
    }

    /// Get display name
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown-channel")
    }
}
