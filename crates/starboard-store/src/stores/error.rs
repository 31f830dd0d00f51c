//! Error handling utilities for stores

use std::path::Path;

use starboard_core::error::DomainError;

/// Convert an I/O error on `path` to DomainError
pub fn map_io_error(path: &Path, e: std::io::Error) -> DomainError {
    DomainError::StorageError(format!("{}: {e}", path.display()))
}
