//! Output module for persisting scrape results
//!
//! This module handles:
//! - The `RecordSink` trait consumed after a crawl completes
//! - Upserting records into SQLite
//! - Writing results as JSON

mod json;
mod schema;
mod sqlite_output;
mod traits;

pub use json::JsonSink;
pub use sqlite_output::SqliteSink;
pub use traits::{OutputError, OutputResult, RecordSink};
