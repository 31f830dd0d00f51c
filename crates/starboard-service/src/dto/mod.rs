//! Data transfer objects returned by the services
//!
//! - Reconciliation outcomes, one per starboard an event touched
//! - Leaderboard entries
//! - Resolved star post content

pub mod outcomes;
pub mod responses;

pub use outcomes::ReconcileOutcome;
pub use responses::{LeaderboardEntry, ResolvedContent};
