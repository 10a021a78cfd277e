use crate::config::plan::ScrapePlan;
use crate::config::types::{ExtractionConfig, DEFAULT_USER_AGENT};
use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::collections::BTreeMap;
use url::Url;

/// Validates the entire configuration
///
/// This compiles every selector, so a configuration that passes here will
/// not fail with a configuration error once the crawl starts.
pub fn validate(config: &ExtractionConfig) -> Result<(), ConfigError> {
    ScrapePlan::compile(config).map(|_| ())
}

/// Validates the start URL: absolute, with an HTTP(S) scheme
pub(crate) fn validate_start_url(url: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid url '{}': {}", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "URL '{}' must use the http or https scheme",
            url
        )));
    }

    Ok(parsed)
}

/// Validates the page cap
pub(crate) fn validate_max_pages(max_pages: u32) -> Result<usize, ConfigError> {
    if max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            max_pages
        )));
    }
    Ok(max_pages as usize)
}

/// Validates the per-fetch timeout
pub(crate) fn validate_timeout(timeout_secs: u64) -> Result<u64, ConfigError> {
    if timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            timeout_secs
        )));
    }
    Ok(timeout_secs)
}

/// Checks that at least one field besides the container is configured
pub(crate) fn validate_field_count(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.fields().next().is_none() {
        return Err(ConfigError::Validation(
            "selectors must contain at least one field besides 'container'".to_string(),
        ));
    }
    Ok(())
}

/// Builds the request headers for every fetch
///
/// Custom headers replace the defaults entirely; without them (or with an
/// empty map) a desktop browser user agent is sent.
pub(crate) fn build_headers(
    headers: Option<&BTreeMap<String, String>>,
) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();

    let Some(headers) = headers.filter(|headers| !headers.is_empty()) else {
        map.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        return Ok(map);
    };

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ConfigError::InvalidHeader(format!("'{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ConfigError::InvalidHeader(format!("value of '{}': {}", name, e)))?;
        map.insert(header_name, header_value);
    }

    Ok(map)
}
