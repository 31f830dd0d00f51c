//! Emoji - a unicode grapheme or a custom guild emoji
//!
//! Custom emoji references arrive in several shapes (`<:name:id>`,
//! `<a:name:id>`, `name:id`, a bare id); all of them normalize to
//! [`Emoji::Custom`] holding only the numeric id.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::Snowflake;

/// Emoji used to star messages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Emoji {
    /// Unicode emoji, stored verbatim
    Unicode(String),
    /// Custom guild emoji, identified by its id
    Custom(Snowflake),
}

impl Emoji {
    /// CDN base for custom emoji images
    pub const CDN_BASE: &'static str = "https://cdn.discordapp.com/emojis";

    /// Parse and normalize an emoji reference.
    ///
    /// Anything that is not recognizably a custom emoji reference is kept as
    /// a unicode emoji.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match Self::custom_id(trimmed) {
            Some(id) => Self::Custom(id),
            None => Self::Unicode(trimmed.to_string()),
        }
    }

    /// Build from a gateway reaction emoji (`id` is set for custom emojis)
    pub fn from_reaction(id: Option<Snowflake>, name: Option<&str>) -> Self {
        match id {
            Some(id) => Self::Custom(id),
            None => Self::Unicode(name.unwrap_or_default().to_string()),
        }
    }

    fn custom_id(s: &str) -> Option<Snowflake> {
        let inner = s
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(s);
        let candidate = inner.rsplit(':').next()?;
        // A bare id or the last segment of a `name:id` reference
        if candidate.len() >= 15 && (inner == candidate || inner.contains(':')) {
            Snowflake::parse(candidate).ok()
        } else {
            None
        }
    }

    /// Token written at the start of a star post footer.
    ///
    /// Empty for custom emojis, which are shown as the footer icon instead.
    pub fn footer_token(&self) -> &str {
        match self {
            Self::Unicode(name) => name,
            Self::Custom(_) => "",
        }
    }

    /// Footer icon URL (custom emojis only)
    pub fn image_url(&self) -> Option<String> {
        match self {
            Self::Unicode(_) => None,
            Self::Custom(id) => Some(format!("{}/{id}.png", Self::CDN_BASE)),
        }
    }
}

impl Default for Emoji {
    fn default() -> Self {
        Self::Unicode("⭐".to_string())
    }
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode(name) => f.write_str(name),
            Self::Custom(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for Emoji {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for Emoji {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Emoji {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
