//! Webscrape: a declarative web-extraction engine
//!
//! This crate turns a configuration of CSS-selector rules into structured
//! records, following "next page" links across a bounded number of pages.
//!
//! # Example
//!
//! ```no_run
//! use webscrape::config::ExtractionConfig;
//!
//! # async fn example() -> Result<(), webscrape::ScrapeError> {
//! let config = ExtractionConfig::page_overview("https://example.com/");
//! let result = webscrape::scrape(&config).await?;
//! println!("{} records from {}", result.data.len(), result.source_url);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for scrape operations
///
/// Configuration and transport failures are kept apart so callers can tell
/// "fix your config" from "retry the network".
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Crawl cancelled before {url} after {pages_visited} page(s)")]
    Cancelled { url: String, pages_visited: usize },
}

impl ScrapeError {
    /// Returns true if retrying the same configuration could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Cancelled { .. })
    }
}

/// Configuration-specific errors
///
/// All of these are raised before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector for '{field}' ({selector}): {message}")]
    InvalidSelector {
        field: String,
        selector: String,
        message: String,
    },

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),
}

/// Errors raised while fetching a page
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

impl TransportError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Http { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Result type alias for scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{ExtractionConfig, PaginationRule};
pub use crawler::{scrape, Crawler, ScrapeResult};
pub use extract::{FieldValue, Record, SelectorRule};
