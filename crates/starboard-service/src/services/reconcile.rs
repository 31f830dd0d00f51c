//! Reconciliation engine
//!
//! Keeps star posts in line with the reactions on their source messages.
//! Star posts are never stored: each event re-discovers the post in the
//! starboard channel's recent history (or through the post index) and edits,
//! creates or schedules deletion of it from there.

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use starboard_core::entities::compose;
use starboard_core::events::{ReactionsRemovedAllEvent, StarReactionEvent};
use starboard_core::{
    DomainEvent, Embed, Emoji, FooterMarker, ReactionPayload, Snowflake, SourceDeletePolicy,
    StarPost, StarboardConfig,
};

use crate::dto::ReconcileOutcome;

use super::content::ContentService;
use super::context::ServiceContext;
use super::eligibility::{EligibilityFilter, Rejection, StarAttempt, Verdict};
use super::error::ServiceResult;

/// Reconciliation engine
pub struct ReconcileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReconcileService<'a> {
    /// Create a new ReconcileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A user added a reaction to a message
    ///
    /// # Errors
    /// Platform failures while reading the source, scanning history or
    /// sending a new star post. Edit failures are logged and swallowed.
    #[instrument(skip(self, payload), fields(
        message_id = %payload.message_id,
        channel_id = %payload.channel_id,
        user_id = %payload.user.id,
        emoji = %payload.emoji
    ))]
    pub async fn reaction_add(&self, payload: &ReactionPayload) -> ServiceResult<ReconcileOutcome> {
        if payload.user.bot {
            return Ok(ReconcileOutcome::Ignored);
        }
        let Some(config) = self
            .ctx
            .registry()
            .find_by_guild_and_emoji(payload.guild_id, &payload.emoji)
        else {
            return Ok(ReconcileOutcome::Ignored);
        };

        let Some(channel) = self.ctx.channels().fetch_channel(payload.channel_id).await? else {
            debug!("Source channel is gone");
            return Ok(ReconcileOutcome::Ignored);
        };
        let Some(source) = self
            .ctx
            .messages()
            .fetch_message(payload.channel_id, payload.message_id)
            .await?
        else {
            debug!("Source message is gone");
            return Ok(ReconcileOutcome::Ignored);
        };

        let live_count = self
            .live_count(payload.channel_id, payload.message_id, config.emoji())
            .await;

        let attempt = StarAttempt {
            reactor: &payload.user,
            emoji: &payload.emoji,
            author: &source.author,
            channel: &channel,
            live_count,
        };
        match EligibilityFilter::check_add(&config, &attempt) {
            Verdict::Proceed => {}
            Verdict::Ignore => return Ok(ReconcileOutcome::Ignored),
            Verdict::Reject(reason) => {
                self.reject(reason, payload).await;
                return Ok(ReconcileOutcome::Rejected { reason });
            }
            Verdict::BelowThreshold => {
                debug!(count = ?live_count, threshold = config.options.threshold, "Below threshold");
                return Ok(ReconcileOutcome::BelowThreshold {
                    count: live_count,
                    threshold: config.options.threshold,
                });
            }
        }

        let outcome = match self.locate(&config, source.id).await? {
            Some(post) => {
                if self
                    .ctx
                    .scheduler()
                    .cancel_post(config.channel_id, post.message_id)
                {
                    debug!(post_id = %post.message_id, "Pending star post deletion cancelled by new star");
                }
                let count = live_count
                    .unwrap_or_else(|| post.stars().saturating_add(1))
                    .min(FooterMarker::MAX_COUNT);
                let embed = post.restamp(config.emoji(), count, config.options.color.color_for(count));
                self.edit_quietly(&post, &embed).await;

                info!(post_id = %post.message_id, count, "Star post updated");
                ReconcileOutcome::Updated {
                    channel_id: config.channel_id,
                    post_id: post.message_id,
                    count,
                }
            }
            None => {
                let content = match ContentService::new(self.ctx)
                    .resolve(&source, &config.options)
                    .await
                {
                    Ok(content) => content,
                    Err(e) => match Rejection::from_content_error(&e) {
                        Some(reason) => {
                            self.reject(reason, payload).await;
                            return Ok(ReconcileOutcome::Rejected { reason });
                        }
                        None => return Err(e.into()),
                    },
                };

                let count = live_count.unwrap_or(1).min(FooterMarker::MAX_COUNT);
                let embed = compose(
                    &source,
                    config.emoji(),
                    count,
                    config.options.color.color_for(count),
                    content.description,
                    content.image,
                );
                let post = self.ctx.messages().send_embed(config.channel_id, &embed).await?;
                if let Some(index) = self.ctx.post_index() {
                    index.insert(config.channel_id, source.id, post.id);
                }

                info!(post_id = %post.id, count, "Star post created");
                ReconcileOutcome::Created {
                    channel_id: config.channel_id,
                    post_id: post.id,
                    count,
                }
            }
        };

        self.ctx
            .events()
            .publish(DomainEvent::ReactionAdded(reaction_event(payload)));
        Ok(outcome)
    }

    /// A user took a reaction back
    ///
    /// The post is decremented from its own footer count and scheduled for
    /// deletion once it reaches zero or drops below the threshold.
    #[instrument(skip(self, payload), fields(
        message_id = %payload.message_id,
        channel_id = %payload.channel_id,
        user_id = %payload.user.id,
        emoji = %payload.emoji
    ))]
    pub async fn reaction_remove(&self, payload: &ReactionPayload) -> ServiceResult<ReconcileOutcome> {
        let Some(config) = self
            .ctx
            .registry()
            .find_by_guild_and_emoji(payload.guild_id, &payload.emoji)
        else {
            return Ok(ReconcileOutcome::Ignored);
        };
        if EligibilityFilter::check_removal(&config, &payload.user, &payload.emoji, payload.channel_id)
            == Verdict::Ignore
        {
            return Ok(ReconcileOutcome::Ignored);
        }

        self.ctx
            .events()
            .publish(DomainEvent::ReactionRemoved(reaction_event(payload)));

        let Some(post) = self.locate(&config, payload.message_id).await? else {
            return Ok(ReconcileOutcome::NoPost);
        };

        let count = post.stars().saturating_sub(1);
        let embed = post.restamp(config.emoji(), count, config.options.color.color_for(count));
        self.edit_quietly(&post, &embed).await;

        let live_count = self
            .live_count(payload.channel_id, payload.message_id, config.emoji())
            .await;
        let below = live_count.is_some_and(|live| live < config.options.threshold);

        if count == 0 || below {
            self.ctx
                .scheduler()
                .schedule(config.channel_id, post.message_id);
            info!(post_id = %post.message_id, count, "Star post scheduled for deletion");
            return Ok(ReconcileOutcome::DeletionScheduled {
                channel_id: config.channel_id,
                post_id: post.message_id,
            });
        }

        info!(post_id = %post.message_id, count, "Star post updated");
        Ok(ReconcileOutcome::Updated {
            channel_id: config.channel_id,
            post_id: post.message_id,
            count,
        })
    }

    /// Every reaction was cleared from a message at once
    #[instrument(skip(self))]
    pub async fn remove_all(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<Vec<ReconcileOutcome>> {
        let configs: Vec<StarboardConfig> = self
            .ctx
            .registry()
            .for_guild(guild_id)
            .into_iter()
            .filter(|c| !c.ignores(channel_id))
            .collect();
        if configs.is_empty() {
            return Ok(Vec::new());
        }

        self.ctx
            .events()
            .publish(DomainEvent::ReactionsRemovedAll(ReactionsRemovedAllEvent::new(
                Some(guild_id),
                channel_id,
                message_id,
            )));

        join_all(configs.iter().map(|c| self.zero_and_remove(c, message_id)))
            .await
            .into_iter()
            .collect()
    }

    /// A message was deleted
    ///
    /// Starboards set to `ZeroAndRemove` take their post for it down. A
    /// deleted star post is also dropped from the post index.
    #[instrument(skip(self))]
    pub async fn message_delete(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<Vec<ReconcileOutcome>> {
        if let Some(index) = self.ctx.post_index() {
            index.evict_post(channel_id, message_id);
        }

        let configs: Vec<StarboardConfig> = self
            .ctx
            .registry()
            .for_guild(guild_id)
            .into_iter()
            .filter(|c| {
                c.options.on_source_delete == SourceDeletePolicy::ZeroAndRemove
                    && !c.ignores(channel_id)
            })
            .collect();

        join_all(configs.iter().map(|c| self.zero_and_remove(c, message_id)))
            .await
            .into_iter()
            .collect()
    }

    /// Find the star post mirroring `source_id` on `config`'s starboard
    ///
    /// # Errors
    /// History fetch failures propagate.
    pub async fn locate(
        &self,
        config: &StarboardConfig,
        source_id: Snowflake,
    ) -> ServiceResult<Option<StarPost>> {
        let emoji = config.emoji();
        let self_id = self.ctx.bot_user_id();

        if let Some(index) = self.ctx.post_index() {
            if let Some(post_id) = index.get(config.channel_id, source_id) {
                let hit = self
                    .ctx
                    .messages()
                    .fetch_message(config.channel_id, post_id)
                    .await?
                    .and_then(|m| StarPost::recover(&m, emoji, self_id))
                    .filter(|p| p.source_id() == source_id);
                if hit.is_some() {
                    return Ok(hit);
                }
                index.evict(config.channel_id, source_id);
            }
        }

        let history = self
            .ctx
            .messages()
            .recent_messages(config.channel_id, self.ctx.settings().reconcile.history_limit)
            .await?;
        let found = history
            .iter()
            .filter_map(|m| StarPost::recover(m, emoji, self_id))
            .find(|p| p.source_id() == source_id);

        if let (Some(post), Some(index)) = (&found, self.ctx.post_index()) {
            index.insert(config.channel_id, source_id, post.message_id);
        }
        Ok(found)
    }

    async fn zero_and_remove(
        &self,
        config: &StarboardConfig,
        source_id: Snowflake,
    ) -> ServiceResult<ReconcileOutcome> {
        let Some(post) = self.locate(config, source_id).await? else {
            return Ok(ReconcileOutcome::NoPost);
        };

        let embed = post.restamp(config.emoji(), 0, config.options.color.color_for(0));
        self.edit_quietly(&post, &embed).await;
        self.ctx
            .scheduler()
            .schedule(config.channel_id, post.message_id);

        info!(
            starboard_id = %config.channel_id,
            post_id = %post.message_id,
            "Star post zeroed, deletion scheduled"
        );
        Ok(ReconcileOutcome::DeletionScheduled {
            channel_id: config.channel_id,
            post_id: post.message_id,
        })
    }

    async fn live_count(&self, channel_id: Snowflake, message_id: Snowflake, emoji: &Emoji) -> Option<u32> {
        match self
            .ctx
            .reactions()
            .reaction_count(channel_id, message_id, emoji)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Live reaction count unavailable");
                None
            }
        }
    }

    async fn edit_quietly(&self, post: &StarPost, embed: &Embed) {
        if let Err(e) = self
            .ctx
            .messages()
            .edit_embed(post.channel_id, post.message_id, embed)
            .await
        {
            debug!(post_id = %post.message_id, error = %e, "Star post edit failed, ignoring");
        }
    }

    /// Report a refused star and apply its side effects
    async fn reject(&self, reason: Rejection, payload: &ReactionPayload) {
        self.ctx
            .events()
            .publish(reason.event(reaction_event(payload)));

        if reason.retracts_reaction() {
            if let Err(e) = self
                .ctx
                .reactions()
                .remove_user_reaction(
                    payload.channel_id,
                    payload.message_id,
                    &payload.emoji,
                    payload.user.id,
                )
                .await
            {
                debug!(error = %e, "Could not retract rejected reaction");
            }
        }

        if let Some(notice) = reason.notice(&self.ctx.settings().notices) {
            if let Err(e) = self.ctx.messages().send_text(payload.channel_id, notice).await {
                warn!(error = %e, "Could not post rejection notice");
            }
        }

        info!(reason = ?reason, "Star rejected");
    }
}

fn reaction_event(payload: &ReactionPayload) -> StarReactionEvent {
    StarReactionEvent::new(
        Some(payload.guild_id),
        payload.channel_id,
        payload.message_id,
        payload.user.id,
        payload.emoji.clone(),
    )
}
