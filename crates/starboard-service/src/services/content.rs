//! Content resolver
//!
//! Picks the text and image a new star post shows for its source message.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use starboard_core::{DomainError, Embed, FooterMarker, Message, StarboardOptions};

use crate::dto::ResolvedContent;

use super::context::ServiceContext;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>]+").expect("valid link regex"));

/// Appended to a description that had to be cut
const CONTINUATION: &str = "\n...";

/// Content resolver
pub struct ContentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ContentService<'a> {
    /// Create a new ContentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the star post content for `source`
    ///
    /// # Errors
    /// `AlreadyStarredElsewhere` when the message forwards another star post,
    /// `EmptyContent` when neither text nor image is left.
    #[instrument(skip(self, source, options), fields(message_id = %source.id))]
    pub async fn resolve(
        &self,
        source: &Message,
        options: &StarboardOptions,
    ) -> Result<ResolvedContent, DomainError> {
        if options.allow_embeds && forwards_star_post(source) {
            return Err(DomainError::AlreadyStarredElsewhere);
        }

        let max = self.ctx.settings().reconcile.max_description;
        let description = if !source.is_empty() {
            truncate_description(&source.content, max)
        } else if options.allow_embeds {
            source
                .first_embed()
                .and_then(|e| e.description.as_deref())
                .map(|d| truncate_description(d, max))
                .unwrap_or_default()
        } else {
            String::new()
        };

        let content = ResolvedContent {
            description,
            image: self.resolve_image(source, options).await,
        };

        if content.is_empty() {
            return Err(DomainError::EmptyContent);
        }
        Ok(content)
    }

    async fn resolve_image(&self, source: &Message, options: &StarboardOptions) -> Option<String> {
        if options.allow_attachments {
            if let Some(attachment) = source.attachments.iter().find(|a| a.is_image()) {
                return Some(attachment.url.clone());
            }
        }

        if options.allow_embeds {
            if let Some(image) = source.embeds.iter().find_map(|e| e.image.clone()) {
                return Some(image);
            }
        }

        if options.resolve_link_preview_images {
            let fetcher = self.ctx.link_preview()?;
            let link = first_link(&source.content)?;
            let image = fetcher.resolve_image(link).await;
            debug!(link, resolved = image.is_some(), "Link preview image lookup");
            return image;
        }

        None
    }
}

/// Whether any embed of `source` is a star post for another message
fn forwards_star_post(source: &Message) -> bool {
    source
        .embeds
        .iter()
        .filter_map(Embed::footer_text)
        .filter_map(FooterMarker::decode)
        .any(|marker| marker.source_id != source.id)
}

/// Cut `text` to `max` characters, marking the cut
pub fn truncate_description(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{CONTINUATION}", &text[..cut]),
        None => text.to_string(),
    }
}

/// First bare http(s) link in `text`
pub fn first_link(text: &str) -> Option<&str> {
    LINK_RE.find(text).map(|m| m.as_str())
}
