//! Message entity - a platform message with its attachments and embeds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Color, Snowflake};

use super::User;

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub author: User,
    /// Rendered text, mentions already resolved to display names
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new text message
    pub fn new(id: Snowflake, channel_id: Snowflake, author: User, content: String) -> Self {
        Self {
            id,
            channel_id,
            guild_id: None,
            author,
            content,
            attachments: Vec::new(),
            embeds: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// First embed, which is where star posts keep their summary
    #[inline]
    pub fn first_embed(&self) -> Option<&Embed> {
        self.embeds.first()
    }

    /// Check if message content is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Snowflake,
    pub filename: String,
    pub url: String,
}

impl Attachment {
    /// Image extensions a star post can display
    pub const IMAGE_EXTENSIONS: [&'static str; 4] = ["jpg", "jpeg", "png", "gif"];

    pub fn new(id: Snowflake, filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            url: url.into(),
        }
    }

    /// Check the URL ends in an allowed image extension (query string ignored)
    pub fn is_image(&self) -> bool {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        path.rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.contains('/'))
            .is_some_and(|ext| {
                Self::IMAGE_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }
}

/// Embed author line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Embed footer line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

/// Rich embed, used both for source-message previews and for star posts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub description: Option<String>,
    pub author: Option<EmbedAuthor>,
    pub timestamp: Option<DateTime<Utc>>,
    pub footer: Option<EmbedFooter>,
    pub color: Option<Color>,
    pub image: Option<String>,
}

impl Embed {
    pub fn footer_text(&self) -> Option<&str> {
        self.footer.as_ref().map(|f| f.text.as_str())
    }

    pub fn footer_icon(&self) -> Option<&str> {
        self.footer.as_ref().and_then(|f| f.icon_url.as_deref())
    }
}
