//! Starboard record model - the persisted JSON shape

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the persisted array
///
/// Ids are kept as strings and options as raw JSON so that a record written
/// by an older build (missing option keys) still loads; the mapper fills in
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarboardRecordModel {
    pub channel_id: String,
    pub guild_id: String,
    #[serde(default)]
    pub options: Value,
}

/// The whole store file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarboardDocument {
    pub records: Vec<StarboardRecordModel>,
}

impl StarboardDocument {
    /// Contents written when the store file does not exist yet
    pub const EMPTY: &'static str = "[]";
}
