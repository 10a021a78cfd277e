use url::Url;

/// Schemes that never lead to another fetchable page
const NON_NAVIGABLE_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Returns true if the string already carries an `http://` or `https://` scheme
pub fn is_absolute_http(link: &str) -> bool {
    let lower = link.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolves a possibly relative link against the page it was found on
///
/// Returns None if the link should not be followed:
/// - Empty or whitespace-only links
/// - javascript:, mailto:, tel: and data: links
/// - Links that fail to resolve or resolve to a non-HTTP(S) URL
///
/// # Arguments
///
/// * `base` - URL of the page containing the link
/// * `link` - Raw attribute value
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webscrape::url::resolve_url;
///
/// let base = Url::parse("https://example.com/a/").unwrap();
/// let next = resolve_url(&base, "../b").unwrap();
/// assert_eq!(next.as_str(), "https://example.com/b");
/// ```
pub fn resolve_url(base: &Url, link: &str) -> Option<Url> {
    let link = link.trim();

    if link.is_empty() {
        return None;
    }

    let lower = link.to_ascii_lowercase();
    if NON_NAVIGABLE_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let resolved = if is_absolute_http(link) {
        Url::parse(link).ok()?
    } else {
        base.join(link).ok()?
    };

    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}
