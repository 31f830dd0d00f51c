//! Deletion scheduler
//!
//! Star posts are deleted after a short debounce so that a reaction that is
//! removed and re-added in quick succession does not make the post flicker.
//! A pending deletion is keyed by (starboard channel, star post) and can be
//! cancelled until the delay elapses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::AbortHandle;
use tracing::{debug, instrument};

use starboard_core::traits::MessageHistory;
use starboard_core::Snowflake;

use super::post_index::PostIndex;

/// Identity of a scheduled deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostKey {
    pub channel_id: Snowflake,
    pub post_id: Snowflake,
}

#[derive(Debug)]
struct PendingDeletion {
    ticket: u64,
    abort: Option<AbortHandle>,
}

/// Debounced, cancellable star post deletion
pub struct DeletionScheduler {
    pending: Arc<DashMap<PostKey, PendingDeletion>>,
    messages: Arc<dyn MessageHistory>,
    post_index: Option<Arc<PostIndex>>,
    delay: Duration,
    tickets: AtomicU64,
}

impl DeletionScheduler {
    pub fn new(
        messages: Arc<dyn MessageHistory>,
        post_index: Option<Arc<PostIndex>>,
        delay: Duration,
    ) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            messages,
            post_index,
            delay,
            tickets: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Delete `post_id` once the debounce delay elapses
    ///
    /// Scheduling the same post again restarts the delay.
    #[instrument(skip(self))]
    pub fn schedule(&self, channel_id: Snowflake, post_id: Snowflake) {
        let key = PostKey {
            channel_id,
            post_id,
        };
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed);

        // Register before spawning so a zero delay still finds its own entry
        if let Some(previous) = self.pending.insert(
            key,
            PendingDeletion {
                ticket,
                abort: None,
            },
        ) {
            if let Some(abort) = previous.abort {
                abort.abort();
            }
        }

        let pending = Arc::clone(&self.pending);
        let messages = Arc::clone(&self.messages);
        let post_index = self.post_index.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Whoever removes the entry owns it; a cancelled or superseded
            // deletion finds nothing here
            if pending.remove_if(&key, |_, p| p.ticket == ticket).is_none() {
                return;
            }
            if let Some(index) = post_index {
                index.evict_post(channel_id, post_id);
            }

            match messages.delete_message(channel_id, post_id).await {
                Ok(()) => debug!(channel_id = %channel_id, post_id = %post_id, "Star post deleted"),
                Err(e) => debug!(
                    channel_id = %channel_id,
                    post_id = %post_id,
                    error = %e,
                    "Star post deletion failed, ignoring"
                ),
            }
        });

        if let Some(mut entry) = self.pending.get_mut(&key) {
            if entry.ticket == ticket {
                entry.abort = Some(handle.abort_handle());
            }
        }

        debug!(delay_ms = delay.as_millis() as u64, "Star post deletion scheduled");
    }

    /// Cancel the pending deletion of `post_id`, if any
    ///
    /// Returns whether a deletion was spared.
    pub fn cancel_post(&self, channel_id: Snowflake, post_id: Snowflake) -> bool {
        self.cancel(PostKey {
            channel_id,
            post_id,
        })
        .is_some()
    }

    /// Cancel every pending deletion in a channel
    pub fn cancel_channel(&self, channel_id: Snowflake) -> usize {
        let keys: Vec<PostKey> = self
            .pending
            .iter()
            .filter(|e| e.key().channel_id == channel_id)
            .map(|e| *e.key())
            .collect();

        keys.into_iter().filter_map(|key| self.cancel(key)).count()
    }

    fn cancel(&self, key: PostKey) -> Option<Snowflake> {
        let (key, pending) = self.pending.remove(&key)?;
        if let Some(abort) = pending.abort {
            abort.abort();
        }
        debug!(channel_id = %key.channel_id, post_id = %key.post_id, "Star post deletion cancelled");
        Some(key.post_id)
    }

    pub fn is_pending(&self, channel_id: Snowflake, post_id: Snowflake) -> bool {
        self.pending.contains_key(&PostKey {
            channel_id,
            post_id,
        })
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl std::fmt::Debug for DeletionScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeletionScheduler")
            .field("pending", &self.pending.len())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
