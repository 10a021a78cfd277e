use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved selector key that marks record boundaries instead of a field
pub const CONTAINER_KEY: &str = "container";

/// Per-fetch timeout used when the configuration doesn't set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent when the configuration supplies no headers
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Declarative description of one scrape
///
/// Field names use kebab-case in TOML files; the snake_case spellings used
/// by JSON payloads are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// URL of the first page to scrape
    pub url: String,

    /// Field name to selector rule (`selector` or `selector::attribute`)
    pub selectors: BTreeMap<String, String>,

    /// How to find the next page, if the listing is paginated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationRule>,

    /// Maximum number of pages to visit
    #[serde(rename = "max-pages", alias = "max_pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Custom request headers; replaces the default user agent when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Timeout for each page fetch (seconds)
    #[serde(
        rename = "timeout-secs",
        alias = "timeout_secs",
        default = "default_timeout_secs"
    )]
    pub timeout_secs: u64,

    /// Drop records whose fields all came back empty
    #[serde(
        rename = "skip-empty-records",
        alias = "skip_empty_records",
        default
    )]
    pub skip_empty_records: bool,
}

/// Pagination rule: where the "next page" link lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRule {
    /// CSS selector for the next-page element
    pub selector: String,

    /// Attribute holding the next URL (defaults to `href`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,
}

fn default_max_pages() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ExtractionConfig {
    /// Creates a single-page configuration with the given selectors
    pub fn new<I, K, V>(url: impl Into<String>, selectors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            url: url.into(),
            selectors: selectors
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            pagination: None,
            max_pages: default_max_pages(),
            headers: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            skip_empty_records: false,
        }
    }

    /// General-purpose configuration for an arbitrary page
    ///
    /// Collects the title, headings, paragraphs, link targets and image
    /// sources of a single page.
    pub fn page_overview(url: impl Into<String>) -> Self {
        Self::new(
            url,
            [
                ("title", "title"),
                ("headings", "h1, h2, h3"),
                ("paragraphs", "p"),
                ("links", "a::href"),
                ("images", "img::src"),
            ],
        )
    }

    /// Adds a pagination rule and raises the page cap
    pub fn with_pagination(
        mut self,
        selector: impl Into<String>,
        attr: Option<&str>,
        max_pages: u32,
    ) -> Self {
        self.pagination = Some(PaginationRule {
            selector: selector.into(),
            attr: attr.map(str::to_string),
        });
        self.max_pages = max_pages;
        self
    }

    /// Adds a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// The container selector, if one is configured
    pub fn container(&self) -> Option<&str> {
        self.selectors.get(CONTAINER_KEY).map(String::as_str)
    }

    /// Selector entries that produce record fields (everything but `container`)
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selectors
            .iter()
            .filter(|(name, _)| name.as_str() != CONTAINER_KEY)
            .map(|(name, rule)| (name.as_str(), rule.as_str()))
    }
}
