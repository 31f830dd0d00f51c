//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{Emoji, Snowflake};

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("A starboard for {emoji} already exists in channel {channel_id}")]
    DuplicateConfig { channel_id: Snowflake, emoji: Emoji },

    #[error("Channel {channel_id} has no starboard for {emoji}")]
    ConfigNotFound { channel_id: Snowflake, emoji: Emoji },

    #[error("The storage file is not properly formatted ({0})")]
    MalformedStore(String),

    // =========================================================================
    // Content Errors
    // =========================================================================
    #[error("Message is already a star post of another starboard")]
    AlreadyStarredElsewhere,

    #[error("Message has no starrable content")]
    EmptyContent,

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Platform error: {0}")]
    PlatformError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateConfig { .. } => "DUPLICATE_CONFIG",
            Self::ConfigNotFound { .. } => "UNKNOWN_STARBOARD",
            Self::MalformedStore(_) => "MALFORMED_STORE",
            Self::AlreadyStarredElsewhere => "ALREADY_STARRED_ELSEWHERE",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::PlatformError(_) => "PLATFORM_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ChannelNotFound(_) | Self::MessageNotFound(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateConfig { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if this rejects a message's content rather than signalling a fault
    pub fn is_content_rejection(&self) -> bool {
        matches!(self, Self::AlreadyStarredElsewhere | Self::EmptyContent)
    }
}
