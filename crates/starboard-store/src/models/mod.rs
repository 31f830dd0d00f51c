//! On-disk models

mod record;

pub use record::{StarboardDocument, StarboardRecordModel};
