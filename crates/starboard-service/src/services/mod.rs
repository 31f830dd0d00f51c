//! Business logic services
//!
//! Configuration registry and persistence, eligibility checks, content
//! resolution, star post reconciliation and leaderboards, plus the runtime
//! pieces they share (event bus, deletion scheduler, post index).

pub mod bus;
pub mod content;
pub mod context;
pub mod eligibility;
pub mod error;
pub mod leaderboard;
pub mod link_preview;
pub mod manager;
pub mod post_index;
pub mod reconcile;
pub mod registry;
pub mod scheduler;
pub mod starboard;

// Re-export all services for convenience
pub use bus::EventBus;
pub use content::ContentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use eligibility::{EligibilityFilter, Rejection, StarAttempt, Verdict};
pub use error::{ServiceError, ServiceResult};
pub use leaderboard::LeaderboardService;
pub use link_preview::HttpLinkResolver;
pub use manager::StarboardManager;
pub use post_index::PostIndex;
pub use reconcile::ReconcileService;
pub use registry::StarboardRegistry;
pub use scheduler::DeletionScheduler;
pub use starboard::StarboardService;
