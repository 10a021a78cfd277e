//! Next-page discovery
//!
//! Locates the pagination element on a parsed page and turns its link into
//! the URL of the following page.

use crate::config::PaginationPlan;
use crate::url::resolve_url;
use scraper::Html;
use url::Url;

/// Outcome of looking for the next page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch this URL next
    Follow(Url),

    /// The pagination selector matched nothing
    NoElement,

    /// The element exists but its link attribute is missing or blank
    NoLink,

    /// The link can't be turned into a fetchable URL
    Unresolvable(String),
}

impl NextPage {
    /// The URL to follow, if any
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Follow(url) => Some(url),
            _ => None,
        }
    }
}

/// Finds the next page link in a document
///
/// Only the first element matching the pagination selector is considered.
/// Relative links are resolved against `current`, the URL of the page
/// being processed. A link back to the current page is still followed; the
/// page cap bounds such loops.
///
/// # Arguments
///
/// * `document` - The parsed current page
/// * `plan` - Compiled pagination rule
/// * `current` - URL the document was fetched from
pub fn find_next_page(document: &Html, plan: &PaginationPlan, current: &Url) -> NextPage {
    let Some(element) = document.select(&plan.selector).next() else {
        return NextPage::NoElement;
    };

    let raw = match element.value().attr(&plan.attr) {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return NextPage::NoLink,
    };

    match resolve_url(current, raw) {
        Some(next) => NextPage::Follow(next),
        None => NextPage::Unresolvable(raw.to_string()),
    }
}
