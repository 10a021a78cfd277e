use crate::extract::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of one crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// The configured start URL (not the last page visited)
    pub source_url: String,

    /// When the crawl completed
    pub timestamp: DateTime<Utc>,

    /// Records from every visited page, in page order then document order
    pub data: Vec<Record>,

    /// Number of pages fetched
    #[serde(default)]
    pub pages_visited: usize,
}

impl ScrapeResult {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Serializes the result to pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
