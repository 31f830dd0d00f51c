//! # starboard-core
//!
//! Domain layer for the starboard: value objects, entities, the footer codec,
//! domain events, and the port traits the reconciliation engine talks through.
//! This crate has zero dependencies on infrastructure (HTTP, filesystem, gateway).

pub mod codec;
pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use codec::FooterMarker;
pub use entities::{
    Attachment, Channel, Embed, EmbedAuthor, EmbedFooter, Message, SourceDeletePolicy, StarPost,
    StarboardConfig, StarboardOptions, StarboardOptionsPatch, User,
};
pub use error::DomainError;
pub use events::{DomainEvent, PlatformEvent, ReactionPayload};
pub use traits::{
    ChannelDirectory, ConfigRecord, ConfigStore, LinkPreviewFetcher, MessageHistory,
    PlatformResult, ReactionState, RepoResult,
};
pub use value_objects::{
    Color, ColorParseError, ColorSpec, Emoji, GradientSpec, Snowflake, SnowflakeParseError,
};
