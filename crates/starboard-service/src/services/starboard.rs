//! Starboard configuration service
//!
//! Create, edit and delete starboards. Every change is written through to the
//! config store; a failed write puts the registry back the way it was.

use tracing::{info, instrument, warn};

use starboard_core::events::{StarboardChangedEvent, StarboardEditedEvent};
use starboard_core::{
    DomainError, DomainEvent, Emoji, Snowflake, StarboardConfig, StarboardOptions,
    StarboardOptionsPatch,
};

use crate::dto::ReconcileOutcome;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Starboard configuration service
pub struct StarboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StarboardService<'a> {
    /// Create a new StarboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load every starboard from the store, replacing the registry
    ///
    /// # Errors
    /// `MalformedStore` when the stored document cannot be read.
    #[instrument(skip(self))]
    pub async fn load(&self) -> ServiceResult<usize> {
        let configs: Vec<StarboardConfig> = self
            .ctx
            .store()
            .load_all()
            .await?
            .into_iter()
            .map(StarboardConfig::from)
            .collect();

        let count = configs.len();
        self.ctx.registry().replace_all(configs);
        info!(count, "Starboards loaded");
        Ok(count)
    }

    /// Create a starboard posting into `channel_id`
    ///
    /// # Errors
    /// - `ChannelNotFound` if the channel does not exist
    /// - `ValidationError` for unusable options
    /// - `DuplicateConfig` if the channel already has a starboard for the emoji
    #[instrument(skip(self, patch))]
    pub async fn create(
        &self,
        channel_id: Snowflake,
        guild_id: Snowflake,
        patch: StarboardOptionsPatch,
    ) -> ServiceResult<StarboardConfig> {
        if self.ctx.channels().fetch_channel(channel_id).await?.is_none() {
            return Err(DomainError::ChannelNotFound(channel_id).into());
        }

        let options = StarboardOptions::from_patch(patch);
        options.validate_options()?;
        let config = StarboardConfig::new(guild_id, channel_id, options);

        self.ctx.registry().add(config.clone())?;
        if let Err(e) = self.persist().await {
            warn!(error = %e, "Could not persist new starboard, rolling back");
            if let Err(rollback) = self.ctx.registry().remove(channel_id, config.emoji()) {
                warn!(error = %rollback, "Starboard rollback found nothing to remove");
            }
            return Err(e);
        }

        self.ctx
            .events()
            .publish(DomainEvent::StarboardCreated(StarboardChangedEvent::new(config.clone())));
        info!(emoji = %config.emoji(), "Starboard created");
        Ok(config)
    }

    /// Delete the starboard on (channel, emoji)
    ///
    /// # Errors
    /// `ConfigNotFound` if there is no such starboard.
    #[instrument(skip(self))]
    pub async fn delete(&self, channel_id: Snowflake, emoji: &Emoji) -> ServiceResult<StarboardConfig> {
        let removed = self.ctx.registry().remove(channel_id, emoji)?;
        if let Err(e) = self.persist().await {
            self.ctx.registry().restore(removed);
            return Err(e);
        }

        self.ctx
            .events()
            .publish(DomainEvent::StarboardDeleted(StarboardChangedEvent::new(removed.clone())));
        info!("Starboard deleted");
        Ok(removed)
    }

    /// Apply `patch` to the starboard on (channel, emoji)
    ///
    /// The emoji itself never changes through an edit.
    ///
    /// # Errors
    /// `ConfigNotFound` or `ValidationError`; the starboard is untouched on error.
    #[instrument(skip(self, patch))]
    pub async fn edit(
        &self,
        channel_id: Snowflake,
        emoji: &Emoji,
        patch: StarboardOptionsPatch,
    ) -> ServiceResult<StarboardConfig> {
        let (old, new) = self.ctx.registry().edit(channel_id, emoji, patch)?;
        if let Err(e) = self.persist().await {
            self.ctx.registry().restore(old);
            return Err(e);
        }

        self.ctx
            .events()
            .publish(DomainEvent::StarboardEdited(StarboardEditedEvent::new(old, new.clone())));
        info!("Starboard edited");
        Ok(new)
    }

    /// Forget every starboard that posted into a deleted channel
    #[instrument(skip(self))]
    pub async fn remove_channel(&self, channel_id: Snowflake) -> ServiceResult<Vec<ReconcileOutcome>> {
        let removed = self.ctx.registry().remove_channel(channel_id);
        if removed.is_empty() {
            return Ok(Vec::new());
        }

        let cancelled = self.ctx.scheduler().cancel_channel(channel_id);
        if let Some(index) = self.ctx.post_index() {
            index.evict_channel(channel_id);
        }

        if let Err(e) = self.persist().await {
            warn!(error = %e, "Could not persist starboard removal, restoring");
            for config in removed {
                self.ctx.registry().restore(config);
            }
            return Err(e);
        }

        let outcomes = removed
            .into_iter()
            .map(|config| {
                let outcome = ReconcileOutcome::StarboardRemoved {
                    channel_id,
                    emoji: config.emoji().clone(),
                };
                self.ctx
                    .events()
                    .publish(DomainEvent::StarboardDeleted(StarboardChangedEvent::new(config)));
                outcome
            })
            .collect::<Vec<_>>();

        info!(removed = outcomes.len(), cancelled, "Starboard channel deleted");
        Ok(outcomes)
    }

    async fn persist(&self) -> ServiceResult<()> {
        self.ctx
            .store()
            .save_all(&self.ctx.registry().records())
            .await?;
        Ok(())
    }
}
