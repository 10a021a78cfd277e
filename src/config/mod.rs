//! Configuration module for Webscrape
//!
//! This module handles loading, parsing, validating and compiling extraction
//! configurations. A configuration can be written as TOML or JSON.
//!
//! # Example
//!
//! ```no_run
//! use webscrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrape.toml")).unwrap();
//! println!("Will visit at most {} page(s)", config.max_pages);
//! ```

mod parser;
mod plan;
mod types;
mod validation;

// Re-export types
pub use plan::{PaginationPlan, ScrapePlan};
pub use types::{
    ExtractionConfig, PaginationRule, CONTAINER_KEY, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    config_fingerprint, load_config, load_config_with_hash, parse_config_json, parse_config_toml,
};
pub use validation::validate;
