//! Star post footer marker
//!
//! Format: `<token> <count> | <source message id>`, where the token is the
//! starboard's unicode emoji (or nothing for custom emojis). The footer is
//! the only place a star post records which message it mirrors and how many
//! stars it has, so decoding it is how a post is recognized at all.

use std::fmt;

use crate::value_objects::{Emoji, Snowflake};

/// Decoded footer of a star post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterMarker {
    /// Leading emoji token, empty when absent
    pub token: String,
    pub count: u32,
    pub source_id: Snowflake,
}

impl FooterMarker {
    /// Largest count the footer can carry (three digits)
    pub const MAX_COUNT: u32 = 999;

    const SEPARATOR: &'static str = " | ";

    pub fn new(emoji: &Emoji, count: u32, source_id: Snowflake) -> Self {
        Self {
            token: emoji.footer_token().to_string(),
            count: count.min(Self::MAX_COUNT),
            source_id,
        }
    }

    /// Encode a footer for `emoji` with `count` stars
    pub fn encode(emoji: &Emoji, count: u32, source_id: Snowflake) -> String {
        Self::new(emoji, count, source_id).to_string()
    }

    /// Decode footer text; anything that is not a well-formed marker is `None`
    pub fn decode(text: &str) -> Option<Self> {
        let (head, id) = text.trim().rsplit_once(Self::SEPARATOR)?;

        if !(17..=20).contains(&id.len()) || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let source_id = Snowflake::parse(id).ok()?;

        let (token, count) = match head.rsplit_once(' ') {
            Some((token, count)) => (token.trim(), count),
            None => ("", head),
        };

        if !(1..=3).contains(&count.len()) || !count.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let count = count.parse().ok()?;

        Some(Self {
            token: token.to_string(),
            count,
            source_id,
        })
    }

    /// Whether the marker's token was written for `emoji`
    pub fn matches_token(&self, emoji: &Emoji) -> bool {
        self.token == emoji.footer_token()
    }
}

impl fmt::Display for FooterMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.token.is_empty() {
            write!(f, "{}{}{}", self.count, Self::SEPARATOR, self.source_id)
        } else {
            write!(
                f,
                "{} {}{}{}",
                self.token,
                self.count,
                Self::SEPARATOR,
                self.source_id
            )
        }
    }
}
