//! JSON file implementation of ConfigStore

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use starboard_core::traits::{ConfigRecord, ConfigStore, RepoResult};

use crate::mappers::{parse_document, render_document};
use crate::models::StarboardDocument;

use super::error::map_io_error;

/// Whole starboard list kept as one JSON array in a file
///
/// A missing file is created holding `[]`. Writes go to a sibling temp file
/// that is then renamed over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a new JsonFileStore
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_atomically(&self, contents: &str) -> RepoResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| map_io_error(parent, e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, contents)
            .await
            .map_err(|e| map_io_error(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| map_io_error(&self.path, e))
    }
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_all(&self) -> RepoResult<Vec<ConfigRecord>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Store file missing, creating an empty one");
                let _guard = self.write_lock.lock().await;
                self.write_atomically(StarboardDocument::EMPTY).await?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(map_io_error(&self.path, e)),
        };

        let records = parse_document(&text)?;
        debug!(count = records.len(), "Loaded starboards");
        Ok(records)
    }

    #[instrument(skip(self, records), fields(path = %self.path.display(), count = records.len()))]
    async fn save_all(&self, records: &[ConfigRecord]) -> RepoResult<()> {
        let contents = render_document(records)?;
        let _guard = self.write_lock.lock().await;
        self.write_atomically(&contents).await?;
        debug!("Saved starboards");
        Ok(())
    }
}
