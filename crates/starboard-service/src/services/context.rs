//! Service context - dependency container for services
//!
//! Holds the platform ports, the config store, the starboard registry and
//! the runtime state (deletion scheduler, post index, event bus) that every
//! service borrows.

use std::sync::Arc;

use starboard_common::AppConfig;
use starboard_core::traits::{
    ChannelDirectory, ConfigStore, LinkPreviewFetcher, MessageHistory, ReactionState,
};
use starboard_core::Snowflake;

use super::bus::EventBus;
use super::error::{ServiceError, ServiceResult};
use super::post_index::PostIndex;
use super::registry::StarboardRegistry;
use super::scheduler::DeletionScheduler;

/// Service context containing all dependencies
///
/// Cheap to clone; everything inside is shared.
#[derive(Clone)]
pub struct ServiceContext {
    // Platform ports
    channels: Arc<dyn ChannelDirectory>,
    messages: Arc<dyn MessageHistory>,
    reactions: Arc<dyn ReactionState>,
    link_preview: Option<Arc<dyn LinkPreviewFetcher>>,

    // Persistence
    store: Arc<dyn ConfigStore>,
    registry: Arc<StarboardRegistry>,

    // Runtime state
    scheduler: Arc<DeletionScheduler>,
    post_index: Option<Arc<PostIndex>>,
    events: EventBus,

    settings: Arc<AppConfig>,
    bot_user_id: Snowflake,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        channels: Arc<dyn ChannelDirectory>,
        messages: Arc<dyn MessageHistory>,
        reactions: Arc<dyn ReactionState>,
        link_preview: Option<Arc<dyn LinkPreviewFetcher>>,
        store: Arc<dyn ConfigStore>,
        settings: AppConfig,
        bot_user_id: Snowflake,
        events: EventBus,
    ) -> Self {
        let post_index = settings
            .reconcile
            .post_index
            .then(|| Arc::new(PostIndex::new()));
        let scheduler = Arc::new(DeletionScheduler::new(
            Arc::clone(&messages),
            post_index.clone(),
            settings.reconcile.delete_delay(),
        ));

        Self {
            channels,
            messages,
            reactions,
            link_preview,
            store,
            registry: Arc::new(StarboardRegistry::new()),
            scheduler,
            post_index,
            events,
            settings: Arc::new(settings),
            bot_user_id,
        }
    }

    // === Platform ===

    pub fn channels(&self) -> &dyn ChannelDirectory {
        self.channels.as_ref()
    }

    pub fn messages(&self) -> &dyn MessageHistory {
        self.messages.as_ref()
    }

    pub fn reactions(&self) -> &dyn ReactionState {
        self.reactions.as_ref()
    }

    /// Link preview resolver, if link images are resolvable at all
    pub fn link_preview(&self) -> Option<&dyn LinkPreviewFetcher> {
        self.link_preview.as_deref()
    }

    // === Persistence ===

    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    pub fn registry(&self) -> &StarboardRegistry {
        self.registry.as_ref()
    }

    // === Runtime ===

    pub fn scheduler(&self) -> &DeletionScheduler {
        self.scheduler.as_ref()
    }

    /// Star post index, when enabled
    pub fn post_index(&self) -> Option<&PostIndex> {
        self.post_index.as_deref()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // === Settings ===

    pub fn settings(&self) -> &AppConfig {
        self.settings.as_ref()
    }

    /// The user this system posts star posts as
    pub fn bot_user_id(&self) -> Snowflake {
        self.bot_user_id
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("bot_user_id", &self.bot_user_id)
            .field("starboards", &self.registry.len())
            .field("scheduler", &self.scheduler)
            .field("post_index", &self.post_index.is_some())
            .field("ports", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    channels: Option<Arc<dyn ChannelDirectory>>,
    messages: Option<Arc<dyn MessageHistory>>,
    reactions: Option<Arc<dyn ReactionState>>,
    link_preview: Option<Arc<dyn LinkPreviewFetcher>>,
    store: Option<Arc<dyn ConfigStore>>,
    settings: Option<AppConfig>,
    bot_user_id: Option<Snowflake>,
    event_capacity: usize,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            channels: None,
            messages: None,
            reactions: None,
            link_preview: None,
            store: None,
            settings: None,
            bot_user_id: None,
            event_capacity: EventBus::DEFAULT_CAPACITY,
        }
    }

    /// Use one platform client for channels, messages and reactions
    pub fn platform<P>(self, platform: Arc<P>) -> Self
    where
        P: ChannelDirectory + MessageHistory + ReactionState + 'static,
    {
        self.channels(platform.clone())
            .messages(platform.clone())
            .reactions(platform)
    }

    pub fn channels(mut self, channels: Arc<dyn ChannelDirectory>) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn messages(mut self, messages: Arc<dyn MessageHistory>) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn reactions(mut self, reactions: Arc<dyn ReactionState>) -> Self {
        self.reactions = Some(reactions);
        self
    }

    pub fn link_preview(mut self, fetcher: Arc<dyn LinkPreviewFetcher>) -> Self {
        self.link_preview = Some(fetcher);
        self
    }

    pub fn store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn settings(mut self, settings: AppConfig) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn bot_user_id(mut self, id: Snowflake) -> Self {
        self.bot_user_id = Some(id);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.channels
                .ok_or_else(|| ServiceError::validation("channels is required"))?,
            self.messages
                .ok_or_else(|| ServiceError::validation("messages is required"))?,
            self.reactions
                .ok_or_else(|| ServiceError::validation("reactions is required"))?,
            self.link_preview,
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.settings.unwrap_or_default(),
            self.bot_user_id
                .ok_or_else(|| ServiceError::validation("bot_user_id is required"))?,
            EventBus::new(self.event_capacity),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
