//! Reconciliation outcomes

use serde::Serialize;

use starboard_core::{Emoji, Snowflake};

use crate::services::eligibility::Rejection;

/// What handling one event did to one starboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// No starboard cares about this event
    Ignored,
    /// The star was refused
    Rejected { reason: Rejection },
    /// Not enough stars yet
    BelowThreshold { count: Option<u32>, threshold: u32 },
    /// Nothing to update: no star post mirrors the message
    NoPost,
    Created {
        channel_id: Snowflake,
        post_id: Snowflake,
        count: u32,
    },
    Updated {
        channel_id: Snowflake,
        post_id: Snowflake,
        count: u32,
    },
    /// Star post zeroed or decremented, deletion pending
    DeletionScheduled {
        channel_id: Snowflake,
        post_id: Snowflake,
    },
    /// A starboard went away with its channel
    StarboardRemoved { channel_id: Snowflake, emoji: Emoji },
}

impl ReconcileOutcome {
    /// Star post the outcome refers to, if any
    pub fn post_id(&self) -> Option<Snowflake> {
        match self {
            Self::Created { post_id, .. }
            | Self::Updated { post_id, .. }
            | Self::DeletionScheduled { post_id, .. } => Some(*post_id),
            _ => None,
        }
    }

    /// Whether a star post was written or scheduled for removal
    pub fn touched_post(&self) -> bool {
        self.post_id().is_some()
    }
}
