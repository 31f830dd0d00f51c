//! Domain events - emitted when starboards change or reactions are judged
//!
//! These events are side-channel notifications for subscribers (logging,
//! audit, user feedback); nothing in reconciliation waits on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::StarboardConfig;
use crate::value_objects::{Emoji, Snowflake};

/// All possible domain events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Starboard Events
    // =========================================================================
    StarboardCreated(StarboardChangedEvent),
    StarboardDeleted(StarboardChangedEvent),
    StarboardEdited(StarboardEditedEvent),

    // =========================================================================
    // Reaction Events
    // =========================================================================
    ReactionAdded(StarReactionEvent),
    ReactionRemoved(StarReactionEvent),
    ReactionsRemovedAll(ReactionsRemovedAllEvent),

    // =========================================================================
    // Rejection Events
    // =========================================================================
    ReactionRejectedNsfw(StarReactionEvent),
    ReactionRejectedSelfStar(StarReactionEvent),
    ReactionRejectedBotAuthor(StarReactionEvent),
    ReactionRejectedEmptyContent(StarReactionEvent),
    ReactionRejectedAlreadyStarred(StarReactionEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StarboardCreated(_) => "STARBOARD_CREATED",
            Self::StarboardDeleted(_) => "STARBOARD_DELETED",
            Self::StarboardEdited(_) => "STARBOARD_EDITED",
            Self::ReactionAdded(_) => "REACTION_ADDED",
            Self::ReactionRemoved(_) => "REACTION_REMOVED",
            Self::ReactionsRemovedAll(_) => "REACTIONS_REMOVED_ALL",
            Self::ReactionRejectedNsfw(_) => "REACTION_REJECTED_NSFW",
            Self::ReactionRejectedSelfStar(_) => "REACTION_REJECTED_SELF_STAR",
            Self::ReactionRejectedBotAuthor(_) => "REACTION_REJECTED_BOT_AUTHOR",
            Self::ReactionRejectedEmptyContent(_) => "REACTION_REJECTED_EMPTY_CONTENT",
            Self::ReactionRejectedAlreadyStarred(_) => "REACTION_REJECTED_ALREADY_STARRED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::StarboardCreated(e) | Self::StarboardDeleted(e) => e.timestamp,
            Self::StarboardEdited(e) => e.timestamp,
            Self::ReactionsRemovedAll(e) => e.timestamp,
            Self::ReactionAdded(e)
            | Self::ReactionRemoved(e)
            | Self::ReactionRejectedNsfw(e)
            | Self::ReactionRejectedSelfStar(e)
            | Self::ReactionRejectedBotAuthor(e)
            | Self::ReactionRejectedEmptyContent(e)
            | Self::ReactionRejectedAlreadyStarred(e) => e.timestamp,
        }
    }

    /// Check if this event reports a refused star
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::ReactionRejectedNsfw(_)
                | Self::ReactionRejectedSelfStar(_)
                | Self::ReactionRejectedBotAuthor(_)
                | Self::ReactionRejectedEmptyContent(_)
                | Self::ReactionRejectedAlreadyStarred(_)
        )
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarboardChangedEvent {
    pub starboard: StarboardConfig,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarboardEditedEvent {
    pub old: StarboardConfig,
    pub new: StarboardConfig,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarReactionEvent {
    pub guild_id: Option<Snowflake>,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: Emoji,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionsRemovedAllEvent {
    pub guild_id: Option<Snowflake>,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Event Creation Helpers
// ============================================================================

impl StarboardChangedEvent {
    pub fn new(starboard: StarboardConfig) -> Self {
        Self {
            starboard,
            timestamp: Utc::now(),
        }
    }
}

impl StarboardEditedEvent {
    pub fn new(old: StarboardConfig, new: StarboardConfig) -> Self {
        Self {
            old,
            new,
            timestamp: Utc::now(),
        }
    }
}

impl StarReactionEvent {
    pub fn new(
        guild_id: Option<Snowflake>,
        channel_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: Emoji,
    ) -> Self {
        Self {
            guild_id,
            channel_id,
            message_id,
            user_id,
            emoji,
            timestamp: Utc::now(),
        }
    }
}

impl ReactionsRemovedAllEvent {
    pub fn new(guild_id: Option<Snowflake>, channel_id: Snowflake, message_id: Snowflake) -> Self {
        Self {
            guild_id,
            channel_id,
            message_id,
            timestamp: Utc::now(),
        }
    }
}
