//! URL handling module for Webscrape
//!
//! This module resolves next-page links found in a document against the URL
//! of the page they were found on.

mod resolve;

pub use resolve::{is_absolute_http, resolve_url};
