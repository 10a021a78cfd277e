//! Crawler module for paginated extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Next-page discovery and URL resolution
//! - Overall crawl coordination and termination

mod coordinator;
mod fetcher;
mod paginator;
mod result;

pub use coordinator::{scrape, Crawler};
pub use fetcher::{build_http_client, FetchRequest, FetchResponse, Fetcher, HttpFetcher};
pub use paginator::{find_next_page, NextPage};
pub use result::ScrapeResult;
