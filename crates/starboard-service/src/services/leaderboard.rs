//! Leaderboard service
//!
//! Ranks the star posts found in a starboard channel's recent history.

use tracing::{debug, instrument};

use starboard_core::{DomainError, Emoji, Snowflake, StarPost};

use crate::dto::LeaderboardEntry;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Leaderboard service
pub struct LeaderboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardService<'a> {
    /// Create a new LeaderboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Top `count` star posts of the starboard on (channel, emoji), most
    /// starred first
    ///
    /// Posts with equal counts keep their history order (newest first).
    ///
    /// # Errors
    /// `ConfigNotFound` or `ChannelNotFound`; history fetch failures propagate.
    #[instrument(skip(self))]
    pub async fn top(
        &self,
        channel_id: Snowflake,
        emoji: &Emoji,
        count: usize,
    ) -> ServiceResult<Vec<LeaderboardEntry>> {
        if self
            .ctx
            .registry()
            .find_by_channel_and_emoji(channel_id, emoji)
            .is_none()
        {
            return Err(DomainError::ConfigNotFound {
                channel_id,
                emoji: emoji.clone(),
            }
            .into());
        }
        if self.ctx.channels().fetch_channel(channel_id).await?.is_none() {
            return Err(DomainError::ChannelNotFound(channel_id).into());
        }

        let history = self
            .ctx
            .messages()
            .recent_messages(channel_id, self.ctx.settings().reconcile.history_limit)
            .await?;

        let self_id = self.ctx.bot_user_id();
        let mut entries: Vec<LeaderboardEntry> = history
            .into_iter()
            .filter_map(|message| {
                let post = StarPost::recover(&message, emoji, self_id)?;
                Some(LeaderboardEntry {
                    source_id: post.source_id(),
                    stars: post.stars(),
                    message,
                })
            })
            .collect();

        entries.sort_by(|a, b| b.stars.cmp(&a.stars));
        entries.truncate(count);

        debug!(entries = entries.len(), "Leaderboard built");
        Ok(entries)
    }
}
