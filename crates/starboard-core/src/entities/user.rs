//! User entity - message authors and reacting users

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    /// Display tag (e.g. `name#0001`)
    pub tag: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Create a new (non-bot) user
    pub fn new(id: Snowflake, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            avatar_url: None,
            bot: false,
        }
    }

    /// Create a bot user
    pub fn new_bot(id: Snowflake, tag: impl Into<String>) -> Self {
        Self {
            bot: true,
            ..Self::new(id, tag)
        }
    }

    #[must_use]
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}
