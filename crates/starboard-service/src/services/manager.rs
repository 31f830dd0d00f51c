//! Starboard manager
//!
//! Public entry point: configuration CRUD, leaderboards and platform event
//! dispatch, all over one shared `ServiceContext`.

use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use starboard_core::{
    DomainEvent, Emoji, PlatformEvent, Snowflake, StarboardConfig, StarboardOptionsPatch,
};

use crate::dto::{LeaderboardEntry, ReconcileOutcome};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::leaderboard::LeaderboardService;
use super::reconcile::ReconcileService;
use super::starboard::StarboardService;

/// Starboard manager
#[derive(Debug, Clone)]
pub struct StarboardManager {
    ctx: ServiceContext,
}

impl StarboardManager {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Load persisted starboards; returns how many were loaded
    pub async fn load(&self) -> ServiceResult<usize> {
        StarboardService::new(&self.ctx).load().await
    }

    pub async fn create_config(
        &self,
        channel_id: Snowflake,
        guild_id: Snowflake,
        patch: StarboardOptionsPatch,
    ) -> ServiceResult<StarboardConfig> {
        StarboardService::new(&self.ctx)
            .create(channel_id, guild_id, patch)
            .await
    }

    pub async fn delete_config(
        &self,
        channel_id: Snowflake,
        emoji: impl Into<Emoji>,
    ) -> ServiceResult<StarboardConfig> {
        StarboardService::new(&self.ctx)
            .delete(channel_id, &emoji.into())
            .await
    }

    pub async fn edit_config(
        &self,
        channel_id: Snowflake,
        emoji: impl Into<Emoji>,
        patch: StarboardOptionsPatch,
    ) -> ServiceResult<StarboardConfig> {
        StarboardService::new(&self.ctx)
            .edit(channel_id, &emoji.into(), patch)
            .await
    }

    /// Edit with a raw JSON options object, as stored on disk
    pub async fn edit_config_json(
        &self,
        channel_id: Snowflake,
        emoji: impl Into<Emoji>,
        options: Value,
    ) -> ServiceResult<StarboardConfig> {
        let patch = StarboardOptionsPatch::from_json(options)?;
        self.edit_config(channel_id, emoji, patch).await
    }

    /// Top star posts; `count` defaults to the configured leaderboard size
    pub async fn leaderboard(
        &self,
        channel_id: Snowflake,
        emoji: impl Into<Emoji>,
        count: Option<usize>,
    ) -> ServiceResult<Vec<LeaderboardEntry>> {
        let count = count.unwrap_or(self.ctx.settings().reconcile.leaderboard_size);
        LeaderboardService::new(&self.ctx)
            .top(channel_id, &emoji.into(), count)
            .await
    }

    /// Every configured starboard
    pub fn starboards(&self) -> Vec<StarboardConfig> {
        self.ctx.registry().all()
    }

    /// Listen to domain events
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.ctx.events().subscribe()
    }

    /// Handle one platform event to completion
    ///
    /// Returns one outcome per starboard the event touched.
    #[instrument(skip(self, event), fields(event_type = event.event_type(), guild_id = %event.guild_id()))]
    pub async fn handle(&self, event: PlatformEvent) -> ServiceResult<Vec<ReconcileOutcome>> {
        let reconcile = ReconcileService::new(&self.ctx);
        let outcomes = match event {
            PlatformEvent::ReactionAdd(payload) => vec![reconcile.reaction_add(&payload).await?],
            PlatformEvent::ReactionRemove(payload) => {
                vec![reconcile.reaction_remove(&payload).await?]
            }
            PlatformEvent::ReactionRemoveAll {
                guild_id,
                channel_id,
                message_id,
            } => reconcile.remove_all(guild_id, channel_id, message_id).await?,
            PlatformEvent::MessageDelete {
                guild_id,
                channel_id,
                message_id,
            } => {
                reconcile
                    .message_delete(guild_id, channel_id, message_id)
                    .await?
            }
            PlatformEvent::ChannelDelete { channel_id, .. } => {
                StarboardService::new(&self.ctx)
                    .remove_channel(channel_id)
                    .await?
            }
        };

        debug!(outcomes = outcomes.len(), "Event handled");
        Ok(outcomes)
    }

    /// Handle an event on its own task; failures are logged
    pub fn dispatch(&self, event: PlatformEvent) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let event_type = event.event_type();
            if let Err(e) = manager.handle(event).await {
                warn!(event_type, error = %e, code = e.error_code(), "Event handling failed");
            }
        })
    }
}
