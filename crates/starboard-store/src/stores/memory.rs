//! In-memory implementation of ConfigStore

use async_trait::async_trait;
use parking_lot::RwLock;

use starboard_core::traits::{ConfigRecord, ConfigStore, RepoResult};

/// Process-local store; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<ConfigRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `records` already persisted
    pub fn with_records(records: Vec<ConfigRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Snapshot of what is currently persisted
    pub fn snapshot(&self) -> Vec<ConfigRecord> {
        self.records.read().clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load_all(&self) -> RepoResult<Vec<ConfigRecord>> {
        Ok(self.snapshot())
    }

    async fn save_all(&self, records: &[ConfigRecord]) -> RepoResult<()> {
        *self.records.write() = records.to_vec();
        Ok(())
    }
}
