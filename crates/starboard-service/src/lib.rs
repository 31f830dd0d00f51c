//! # starboard-service
//!
//! Application layer: the configuration registry, eligibility filter, content
//! resolver, reconciliation engine, leaderboard, and the `StarboardManager`
//! facade that ties them to the platform ports.

pub mod dto;
pub mod services;

pub use dto::{LeaderboardEntry, ReconcileOutcome, ResolvedContent};
pub use services::{
    EventBus, HttpLinkResolver, Rejection, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, StarboardManager,
};
