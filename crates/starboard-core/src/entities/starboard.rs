//! Starboard configuration entity
//!
//! One starboard per (guild, channel, emoji). Options are stored and
//! exchanged in camelCase to match the persisted record shape.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::DomainError;
use crate::value_objects::{ColorSpec, Emoji, Snowflake};

/// What to do with a star post when its source message is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SourceDeletePolicy {
    /// Leave the star post in place
    #[default]
    Ignore,
    /// Zero the footer count, then delete the post after the debounce delay
    ZeroAndRemove,
}

/// Starboard behaviour options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct StarboardOptions {
    pub emoji: Emoji,
    pub star_bot_messages: bool,
    pub allow_self_star: bool,
    pub allow_embeds: bool,
    pub allow_attachments: bool,
    pub resolve_link_preview_images: bool,
    #[validate(range(min = 1, message = "threshold must be at least 1"))]
    pub threshold: u32,
    #[validate(custom(function = "validate_color_spec"))]
    pub color: ColorSpec,
    pub allow_nsfw: bool,
    pub ignored_channel_ids: BTreeSet<Snowflake>,
    pub on_source_delete: SourceDeletePolicy,
}

fn validate_color_spec(spec: &ColorSpec) -> Result<(), ValidationError> {
    if spec.is_usable() {
        Ok(())
    } else {
        Err(ValidationError::new("gradient_needs_colors_and_max"))
    }
}

impl Default for StarboardOptions {
    fn default() -> Self {
        Self {
            emoji: Emoji::default(),
            star_bot_messages: true,
            allow_self_star: true,
            allow_embeds: true,
            allow_attachments: true,
            resolve_link_preview_images: false,
            threshold: 1,
            color: ColorSpec::default(),
            allow_nsfw: false,
            ignored_channel_ids: BTreeSet::new(),
            on_source_delete: SourceDeletePolicy::Ignore,
        }
    }
}

impl StarboardOptions {
    /// Check option invariants
    pub fn validate_options(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))
    }

    /// Build options for a new starboard: defaults overlaid with `patch`
    pub fn from_patch(patch: StarboardOptionsPatch) -> Self {
        let mut options = Self::default();
        if let Some(emoji) = patch.emoji.clone() {
            options.emoji = emoji;
        }
        options.apply(patch);
        options
    }

    /// Apply an edit. The emoji is fixed at creation and is never changed here.
    pub fn apply(&mut self, patch: StarboardOptionsPatch) {
        let StarboardOptionsPatch {
            emoji: _,
            star_bot_messages,
            allow_self_star,
            allow_embeds,
            allow_attachments,
            resolve_link_preview_images,
            threshold,
            color,
            allow_nsfw,
            ignored_channel_ids,
            on_source_delete,
        } = patch;

        if let Some(v) = star_bot_messages {
            self.star_bot_messages = v;
        }
        if let Some(v) = allow_self_star {
            self.allow_self_star = v;
        }
        if let Some(v) = allow_embeds {
            self.allow_embeds = v;
        }
        if let Some(v) = allow_attachments {
            self.allow_attachments = v;
        }
        if let Some(v) = resolve_link_preview_images {
            self.resolve_link_preview_images = v;
        }
        if let Some(v) = threshold {
            self.threshold = v;
        }
        if let Some(v) = color {
            self.color = v;
        }
        if let Some(v) = allow_nsfw {
            self.allow_nsfw = v;
        }
        if let Some(v) = ignored_channel_ids {
            self.ignored_channel_ids = v;
        }
        if let Some(v) = on_source_delete {
            self.on_source_delete = v;
        }
    }
}

/// Partial options, used both for creation (over defaults) and for edits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarboardOptionsPatch {
    pub emoji: Option<Emoji>,
    pub star_bot_messages: Option<bool>,
    pub allow_self_star: Option<bool>,
    pub allow_embeds: Option<bool>,
    pub allow_attachments: Option<bool>,
    pub resolve_link_preview_images: Option<bool>,
    pub threshold: Option<u32>,
    pub color: Option<ColorSpec>,
    pub allow_nsfw: Option<bool>,
    pub ignored_channel_ids: Option<BTreeSet<Snowflake>>,
    pub on_source_delete: Option<SourceDeletePolicy>,
}

impl StarboardOptionsPatch {
    /// Read a patch from loosely-typed JSON; unknown keys are ignored
    pub fn from_json(value: serde_json::Value) -> Result<Self, DomainError> {
        serde_json::from_value(value).map_err(|e| DomainError::ValidationError(e.to_string()))
    }

    /// Patch that only sets the emoji
    pub fn with_emoji(emoji: impl Into<Emoji>) -> Self {
        Self {
            emoji: Some(emoji.into()),
            ..Self::default()
        }
    }
}

/// A starboard: where star posts go and how reactions are judged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarboardConfig {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub options: StarboardOptions,
}

impl StarboardConfig {
    pub fn new(guild_id: Snowflake, channel_id: Snowflake, options: StarboardOptions) -> Self {
        Self {
            guild_id,
            channel_id,
            options,
        }
    }

    #[inline]
    pub fn emoji(&self) -> &Emoji {
        &self.options.emoji
    }

    /// Identity check on (channel, emoji)
    #[inline]
    pub fn is(&self, channel_id: Snowflake, emoji: &Emoji) -> bool {
        self.channel_id == channel_id && &self.options.emoji == emoji
    }

    #[inline]
    pub fn ignores(&self, channel_id: Snowflake) -> bool {
        self.options.ignored_channel_ids.contains(&channel_id)
    }
}
