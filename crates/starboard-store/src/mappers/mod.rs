//! Record <-> model mappers

mod document;
mod record;

pub use document::{parse_document, render_document};
