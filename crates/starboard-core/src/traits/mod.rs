//! Port traits - the interfaces the reconciliation engine consumes
//!
//! The domain layer defines what it needs from the chat platform and from
//! persistent storage; adapters in other crates provide the implementations.

mod platform;
mod store;

pub use platform::{ChannelDirectory, LinkPreviewFetcher, MessageHistory, PlatformResult, ReactionState};
pub use store::{ConfigRecord, ConfigStore, RepoResult};
