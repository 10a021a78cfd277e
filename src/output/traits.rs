//! Output sink trait and error types
//!
//! Sinks consume finished scrape results; the crawl itself never writes.

use crate::crawler::ScrapeResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for completed scrape results
pub trait RecordSink {
    /// Stores a result
    ///
    /// # Arguments
    ///
    /// * `result` - The completed scrape
    /// * `config_hash` - Fingerprint of the configuration that produced it
    ///
    /// # Returns
    ///
    /// The number of records written
    fn store(&mut self, result: &ScrapeResult, config_hash: &str) -> OutputResult<usize>;
}
