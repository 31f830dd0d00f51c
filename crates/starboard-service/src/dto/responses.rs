//! Response DTOs
//!
//! Snowflake IDs are serialized as strings.

use serde::Serialize;

use starboard_core::{Message, Snowflake};

/// One leaderboard row: a star post and its count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// The star post itself
    pub message: Message,
    /// Message the post mirrors
    pub source_id: Snowflake,
    pub stars: u32,
}

/// Text and image chosen for a new star post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedContent {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ResolvedContent {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.image.is_none()
    }
}
