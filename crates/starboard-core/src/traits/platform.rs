//! Chat platform ports

use async_trait::async_trait;

use crate::entities::{Channel, Embed, Message};
use crate::error::DomainError;
use crate::value_objects::{Emoji, Snowflake};

/// Result type for platform calls
pub type PlatformResult<T> = Result<T, DomainError>;

// ============================================================================
// Channel Directory
// ============================================================================

#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Resolve a channel by ID, `None` when it does not exist
    async fn fetch_channel(&self, channel_id: Snowflake) -> PlatformResult<Option<Channel>>;
}

// ============================================================================
// Message History
// ============================================================================

#[async_trait]
pub trait MessageHistory: Send + Sync {
    /// Most recent messages of a channel, newest first
    async fn recent_messages(&self, channel_id: Snowflake, limit: usize)
        -> PlatformResult<Vec<Message>>;

    /// Fetch one message by ID
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<Option<Message>>;

    /// Send a new message carrying a single embed
    async fn send_embed(&self, channel_id: Snowflake, embed: &Embed) -> PlatformResult<Message>;

    /// Send a plain text message
    async fn send_text(&self, channel_id: Snowflake, content: &str) -> PlatformResult<Message>;

    /// Replace the embed of an existing message
    async fn edit_embed(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        embed: &Embed,
    ) -> PlatformResult<()>;

    /// Delete a message
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake)
        -> PlatformResult<()>;
}

// ============================================================================
// Reaction State
// ============================================================================

#[async_trait]
pub trait ReactionState: Send + Sync {
    /// Live number of `emoji` reactions on a message, `None` when the
    /// platform cannot report it
    async fn reaction_count(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
    ) -> PlatformResult<Option<u32>>;

    /// Retract one user's reaction
    async fn remove_user_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &Emoji,
        user_id: Snowflake,
    ) -> PlatformResult<()>;
}

// ============================================================================
// Link Preview
// ============================================================================

#[async_trait]
pub trait LinkPreviewFetcher: Send + Sync {
    /// Resolve a bare link to a displayable image URL; failures read as `None`
    async fn resolve_image(&self, url: &str) -> Option<String>;
}
