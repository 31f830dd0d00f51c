//! Store file text <-> records

use serde_json::Value;

use starboard_core::error::DomainError;
use starboard_core::traits::ConfigRecord;

use crate::models::{StarboardDocument, StarboardRecordModel};

/// Parse the store file contents
///
/// The top level must be a JSON array; anything else (including truncated
/// JSON) is reported as `MalformedStore`.
pub fn parse_document(text: &str) -> Result<Vec<ConfigRecord>, DomainError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        if e.is_eof() {
            DomainError::MalformedStore("Unexpected end of JSON input".to_string())
        } else {
            DomainError::MalformedStore(e.to_string())
        }
    })?;

    let Value::Array(entries) = value else {
        return Err(DomainError::MalformedStore(
            "starboards is not an array".to_string(),
        ));
    };

    let document = StarboardDocument {
        records: entries
            .into_iter()
            .map(serde_json::from_value::<StarboardRecordModel>)
            .collect::<Result<_, _>>()
            .map_err(|e| DomainError::MalformedStore(e.to_string()))?,
    };

    document
        .records
        .into_iter()
        .map(ConfigRecord::try_from)
        .collect()
}

/// Render records as the store file contents
pub fn render_document(records: &[ConfigRecord]) -> Result<String, DomainError> {
    let document = StarboardDocument {
        records: records
            .iter()
            .map(StarboardRecordModel::try_from)
            .collect::<Result<_, _>>()?,
    };

    serde_json::to_string_pretty(&document.records)
        .map_err(|e| DomainError::StorageError(e.to_string()))
}
