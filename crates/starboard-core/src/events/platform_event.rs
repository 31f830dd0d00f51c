//! Inbound platform events the starboard reacts to
//!
//! These mirror the gateway dispatches (`MESSAGE_REACTION_ADD`, ...) after
//! the gateway client has decoded them.

use serde::{Deserialize, Serialize};

use crate::entities::User;
use crate::value_objects::{Emoji, Snowflake};

/// A single user's reaction being added or removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionPayload {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub user: User,
    pub emoji: Emoji,
}

/// Gateway events handled by the starboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformEvent {
    #[serde(rename = "MESSAGE_REACTION_ADD")]
    ReactionAdd(ReactionPayload),
    #[serde(rename = "MESSAGE_REACTION_REMOVE")]
    ReactionRemove(ReactionPayload),
    #[serde(rename = "MESSAGE_REACTION_REMOVE_ALL")]
    ReactionRemoveAll {
        guild_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
    },
    MessageDelete {
        guild_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
    },
    ChannelDelete {
        guild_id: Snowflake,
        channel_id: Snowflake,
    },
}

impl PlatformEvent {
    /// Gateway dispatch name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ReactionAdd(_) => "MESSAGE_REACTION_ADD",
            Self::ReactionRemove(_) => "MESSAGE_REACTION_REMOVE",
            Self::ReactionRemoveAll { .. } => "MESSAGE_REACTION_REMOVE_ALL",
            Self::MessageDelete { .. } => "MESSAGE_DELETE",
            Self::ChannelDelete { .. } => "CHANNEL_DELETE",
        }
    }

    pub fn guild_id(&self) -> Snowflake {
        match self {
            Self::ReactionAdd(p) | Self::ReactionRemove(p) => p.guild_id,
            Self::ReactionRemoveAll { guild_id, .. }
            | Self::MessageDelete { guild_id, .. }
            | Self::ChannelDelete { guild_id, .. } => *guild_id,
        }
    }
}
