//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that drives extraction across pages:
//! - Compiling the configuration before any network activity
//! - Fetching pages one at a time
//! - Extracting records from each page
//! - Following next-page links up to the page cap
//! - Observing cancellation

use crate::config::{ExtractionConfig, ScrapePlan};
use crate::crawler::fetcher::{FetchRequest, FetchResponse, Fetcher, HttpFetcher};
use crate::crawler::paginator::{find_next_page, NextPage};
use crate::crawler::result::ScrapeResult;
use crate::extract::Record;
use crate::{ScrapeError, TransportError};
use chrono::Utc;
use scraper::Html;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Drives crawls against a `Fetcher`
///
/// A crawler holds no per-crawl state, so one instance can serve any number
/// of independent (including concurrent) crawls.
#[derive(Debug, Clone)]
pub struct Crawler<F = HttpFetcher> {
    fetcher: F,
    cancel: CancellationToken,
}

/// Mutable traversal state of one crawl
struct CrawlState {
    current_url: Url,
    records: Vec<Record>,
    pages_visited: usize,
}

/// What one processed page contributed
struct PageOutcome {
    records: Vec<Record>,
    next: Option<Url>,
}

impl Crawler<HttpFetcher> {
    /// Creates a crawler backed by a new HTTP client
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }
}

impl<F: Fetcher> Crawler<F> {
    /// Creates a crawler backed by the given fetcher
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            cancel: CancellationToken::new(),
        }
    }

    /// Attaches a cancellation token
    ///
    /// The token is checked before every fetch and raced against the fetch
    /// in flight. A cancelled crawl returns `ScrapeError::Cancelled` and
    /// discards the records gathered so far.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs a complete crawl for a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeResult)` - Records from every visited page
    /// * `Err(ScrapeError::Config)` - Raised before any fetch
    /// * `Err(ScrapeError::Transport)` - A fetch failed; nothing is returned
    /// * `Err(ScrapeError::Cancelled)` - The token fired
    pub async fn scrape(&self, config: &ExtractionConfig) -> Result<ScrapeResult, ScrapeError> {
        let plan = ScrapePlan::compile(config)?;
        self.run(&config.url, &plan).await
    }

    /// Runs a crawl from an already compiled plan
    ///
    /// `source_url` is reported as the result's source, whatever pages the
    /// crawl goes on to visit.
    pub async fn run(&self, source_url: &str, plan: &ScrapePlan) -> Result<ScrapeResult, ScrapeError> {
        let mut state = CrawlState {
            current_url: plan.start_url.clone(),
            records: Vec::new(),
            pages_visited: 0,
        };

        loop {
            if self.cancel.is_cancelled() {
                return Err(self.cancelled(&state));
            }

            tracing::info!(
                "Scraping page {}: {}",
                state.pages_visited + 1,
                state.current_url
            );

            let response = self.fetch_page(&state, plan).await?;
            state.pages_visited += 1;

            let may_continue = state.pages_visited < plan.max_pages;
            let outcome = process_page(&response, &state.current_url, plan, may_continue);

            tracing::debug!(
                "Extracted {} record(s) from {}",
                outcome.records.len(),
                state.current_url
            );
            state.records.extend(outcome.records);

            match outcome.next {
                Some(next) => state.current_url = next,
                None => break,
            }
        }

        tracing::info!(
            "Scrape of {} finished: {} record(s) from {} page(s)",
            source_url,
            state.records.len(),
            state.pages_visited
        );

        Ok(ScrapeResult {
            source_url: source_url.to_string(),
            timestamp: Utc::now(),
            data: state.records,
            pages_visited: state.pages_visited,
        })
    }

    /// Fetches the current page, enforcing timeout, cancellation and status
    async fn fetch_page(
        &self,
        state: &CrawlState,
        plan: &ScrapePlan,
    ) -> Result<FetchResponse, ScrapeError> {
        let request = FetchRequest {
            url: &state.current_url,
            headers: &plan.headers,
            timeout: plan.timeout,
        };

        let fetch = tokio::time::timeout(plan.timeout, self.fetcher.fetch(request));

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(self.cancelled(state)),
            result = fetch => match result {
                Ok(response) => response?,
                Err(_) => {
                    return Err(TransportError::Timeout {
                        url: state.current_url.to_string(),
                    }
                    .into())
                }
            },
        };

        if !response.is_success() {
            tracing::warn!(
                "HTTP {} from {}, aborting crawl",
                response.status,
                state.current_url
            );
            return Err(TransportError::Status {
                url: state.current_url.to_string(),
                status: response.status,
            }
            .into());
        }

        Ok(response)
    }

    fn cancelled(&self, state: &CrawlState) -> ScrapeError {
        tracing::info!(
            "Crawl cancelled after {} page(s), discarding {} record(s)",
            state.pages_visited,
            state.records.len()
        );
        ScrapeError::Cancelled {
            url: state.current_url.to_string(),
            pages_visited: state.pages_visited,
        }
    }
}

/// Parses one page, extracts its records and looks up the next page
///
/// The parsed document lives only inside this function so it is never
/// held across an await point.
fn process_page(
    response: &FetchResponse,
    current_url: &Url,
    plan: &ScrapePlan,
    may_continue: bool,
) -> PageOutcome {
    if response.final_url != current_url.as_str() {
        tracing::debug!("{} redirected to {}", current_url, response.final_url);
    }

    if let Some(content_type) = &response.content_type {
        if !content_type.contains("html") {
            tracing::debug!(
                "Parsing {} as HTML despite Content-Type {}",
                current_url,
                content_type
            );
        }
    }

    let document = Html::parse_document(&response.body);
    let records = plan.extraction.extract(&document);

    let next = match &plan.pagination {
        Some(pagination) if may_continue => {
            match find_next_page(&document, pagination, current_url) {
                NextPage::Follow(url) => {
                    tracing::debug!("Next page: {}", url);
                    Some(url)
                }
                NextPage::NoElement => {
                    tracing::debug!("No next-page element on {}", current_url);
                    None
                }
                NextPage::NoLink => {
                    tracing::debug!("Next-page element on {} has no link", current_url);
                    None
                }
                NextPage::Unresolvable(raw) => {
                    tracing::warn!(
                        "Cannot follow next-page link '{}' on {}",
                        raw,
                        current_url
                    );
                    None
                }
            }
        }
        Some(_) => {
            tracing::debug!("Page cap of {} reached", plan.max_pages);
            None
        }
        None => None,
    };

    PageOutcome { records, next }
}

/// Runs a complete crawl with a default HTTP crawler
///
/// This is the main entry point. It will:
/// 1. Validate and compile the configuration
/// 2. Build the HTTP client
/// 3. Fetch, extract and paginate until done
///
/// # Example
///
/// ```no_run
/// use webscrape::config::ExtractionConfig;
/// use webscrape::crawler::scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ExtractionConfig::new("https://example.com/", [("title", "h1")]);
/// let result = scrape(&config).await?;
/// println!("{}", result.to_json_pretty()?);
/// # Ok(())
/// # }
/// ```
pub async fn scrape(config: &ExtractionConfig) -> Result<ScrapeResult, ScrapeError> {
    let plan = ScrapePlan::compile(config)?;
    let crawler = Crawler::new().map_err(|source| TransportError::Http {
        url: config.url.clone(),
        source,
    })?;
    crawler.run(&config.url, &plan).await
}
