//! ConfigRecord <-> StarboardRecordModel mapper

use serde_json::Value;

use starboard_core::entities::StarboardOptions;
use starboard_core::error::DomainError;
use starboard_core::traits::ConfigRecord;
use starboard_core::value_objects::Snowflake;

use crate::models::StarboardRecordModel;

fn parse_id(field: &str, raw: &str) -> Result<Snowflake, DomainError> {
    Snowflake::parse(raw)
        .map_err(|_| DomainError::MalformedStore(format!("{field} {raw:?} is not a snowflake")))
}

/// Convert a persisted model into a record, filling missing options with defaults
impl TryFrom<StarboardRecordModel> for ConfigRecord {
    type Error = DomainError;

    fn try_from(model: StarboardRecordModel) -> Result<Self, Self::Error> {
        let options = match model.options {
            Value::Null => StarboardOptions::default(),
            value => serde_json::from_value(value)
                .map_err(|e| DomainError::MalformedStore(e.to_string()))?,
        };

        Ok(ConfigRecord {
            channel_id: parse_id("channelId", &model.channel_id)?,
            guild_id: parse_id("guildId", &model.guild_id)?,
            options,
        })
    }
}

/// Convert a record into its persisted model
impl TryFrom<&ConfigRecord> for StarboardRecordModel {
    type Error = DomainError;

    fn try_from(record: &ConfigRecord) -> Result<Self, Self::Error> {
        Ok(StarboardRecordModel {
            channel_id: record.channel_id.to_string(),
            guild_id: record.guild_id.to_string(),
            options: serde_json::to_value(&record.options)
                .map_err(|e| DomainError::StorageError(e.to_string()))?,
        })
    }
}
