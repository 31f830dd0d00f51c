//! Star post - the mirrored summary of a starred message
//!
//! Star posts are not stored anywhere; they are recognized in the starboard
//! channel's history by their author and their footer marker.

use chrono::Utc;

use crate::codec::FooterMarker;
use crate::value_objects::{Color, Emoji, Snowflake};

use super::{Embed, EmbedAuthor, EmbedFooter, Message};

/// A star post recovered from channel history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarPost {
    pub message_id: Snowflake,
    pub channel_id: Snowflake,
    pub marker: FooterMarker,
    pub embed: Embed,
}

impl StarPost {
    /// Recognize `message` as a star post for `emoji` written by `self_id`
    pub fn recover(message: &Message, emoji: &Emoji, self_id: Snowflake) -> Option<Self> {
        if message.author.id != self_id {
            return None;
        }
        let embed = message.first_embed()?;
        let marker = FooterMarker::decode(embed.footer_text()?)?;

        if !marker.matches_token(emoji) {
            return None;
        }
        if let Some(icon) = emoji.image_url() {
            if embed.footer_icon() != Some(icon.as_str()) {
                return None;
            }
        }

        Some(Self {
            message_id: message.id,
            channel_id: message.channel_id,
            marker,
            embed: embed.clone(),
        })
    }

    #[inline]
    pub fn source_id(&self) -> Snowflake {
        self.marker.source_id
    }

    #[inline]
    pub fn stars(&self) -> u32 {
        self.marker.count
    }

    /// Same summary with a new count and accent; description, image and
    /// author are carried over untouched
    pub fn restamp(&self, emoji: &Emoji, count: u32, color: Color) -> Embed {
        Embed {
            timestamp: Some(Utc::now()),
            footer: Some(footer_for(emoji, count, self.source_id())),
            color: Some(color),
            ..self.embed.clone()
        }
    }
}

/// Footer line for a star post
pub fn footer_for(emoji: &Emoji, count: u32, source_id: Snowflake) -> EmbedFooter {
    EmbedFooter {
        text: FooterMarker::encode(emoji, count, source_id),
        icon_url: emoji.image_url(),
    }
}

/// Compose a brand-new star post summary for `source`
pub fn compose(
    source: &Message,
    emoji: &Emoji,
    count: u32,
    color: Color,
    description: String,
    image: Option<String>,
) -> Embed {
    Embed {
        description: (!description.is_empty()).then_some(description),
        author: Some(EmbedAuthor {
            name: source.author.tag.clone(),
            icon_url: source.author.avatar_url.clone(),
        }),
        timestamp: Some(Utc::now()),
        footer: Some(footer_for(emoji, count, source.id)),
        color: Some(color),
        image,
    }
}
