//! JSON Record Module
//!
//! Reconciles arrays of JSON objects keyed by a named field, so record
//! files can be brought in line with each other without writing a type
//! map for them.
//!
//! # Architecture
//!
//! - `adapter.rs` - Main facade (JsonRecordAdapter)
//! - `record.rs` - Record type with an optional soft delete flag
//! - `error.rs` - Domain-specific errors

mod adapter;
mod error;
mod record;

pub use adapter::{JsonRecordAdapter, RecordOptions};
pub use error::{JsonError, JsonResult};
pub use record::JsonRecord;
