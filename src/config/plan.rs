//! Compiled form of an extraction configuration
//!
//! Every selector is parsed exactly once here, before any network activity.

use crate::config::types::ExtractionConfig;
use crate::config::validation::{
    build_headers, validate_field_count, validate_max_pages, validate_start_url, validate_timeout,
};
use crate::extract::{compile_selector, ExtractionPlan};
use crate::ConfigError;
use reqwest::header::HeaderMap;
use scraper::Selector;
use std::time::Duration;
use url::Url;

/// Attribute read from the next-page element when none is configured
const DEFAULT_NEXT_ATTR: &str = "href";

/// Field name used in error messages for the pagination selector
const PAGINATION_FIELD: &str = "pagination";

/// A validated configuration, ready to drive a crawl
#[derive(Debug, Clone)]
pub struct ScrapePlan {
    /// First page to fetch
    pub start_url: Url,

    /// Compiled record extraction rules
    pub extraction: ExtractionPlan,

    /// Compiled pagination rule
    pub pagination: Option<PaginationPlan>,

    /// Maximum number of pages to visit (>= 1)
    pub max_pages: usize,

    /// Headers sent with every fetch
    pub headers: HeaderMap,

    /// Timeout for each fetch
    pub timeout: Duration,
}

/// Compiled pagination rule
#[derive(Debug, Clone)]
pub struct PaginationPlan {
    /// Selector for the next-page element
    pub selector: Selector,

    /// Attribute holding the next URL
    pub attr: String,
}

impl ScrapePlan {
    /// Validates and compiles a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapePlan)` - The configuration is usable
    /// * `Err(ConfigError)` - Bad URL, selector, header or limit
    pub fn compile(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let start_url = validate_start_url(&config.url)?;
        let max_pages = validate_max_pages(config.max_pages)?;
        let timeout = Duration::from_secs(validate_timeout(config.timeout_secs)?);
        validate_field_count(config)?;

        let extraction = ExtractionPlan::compile(config.container(), config.fields())?
            .skip_empty_records(config.skip_empty_records);

        let pagination = match &config.pagination {
            Some(rule) => {
                let attr = match rule.attr.as_deref().map(str::trim) {
                    Some("") => {
                        return Err(ConfigError::Validation(
                            "pagination attr cannot be empty".to_string(),
                        ))
                    }
                    Some(attr) => attr.to_string(),
                    None => DEFAULT_NEXT_ATTR.to_string(),
                };
                Some(PaginationPlan {
                    selector: compile_selector(PAGINATION_FIELD, &rule.selector)?,
                    attr,
                })
            }
            None => None,
        };

        let headers = build_headers(config.headers.as_ref())?;

        Ok(Self {
            start_url,
            extraction,
            pagination,
            max_pages,
            headers,
            timeout,
        })
    }
}
