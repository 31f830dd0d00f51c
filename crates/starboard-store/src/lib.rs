//! # starboard-store
//!
//! Persistence layer implementing [`ConfigStore`](starboard_core::traits::ConfigStore).
//!
//! ## Overview
//!
//! - On-disk record models and record <-> model mappers
//! - `JsonFileStore`: the whole starboard list as one JSON array in a file
//! - `MemoryStore`: process-local store for tests and ephemeral bots
//!
//! ## Usage
//!
//! ```rust,ignore
//! use starboard_store::JsonFileStore;
//! use starboard_core::traits::ConfigStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JsonFileStore::new("./starboards.json");
//!     let records = store.load_all().await?;
//!     store.save_all(&records).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod stores;

// Re-export commonly used types
pub use stores::{JsonFileStore, MemoryStore};
