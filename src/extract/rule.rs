use crate::ConfigError;
use scraper::Selector;
use std::fmt;
use std::str::FromStr;

/// Separator between the CSS selector and the attribute to read
pub const ATTRIBUTE_SEPARATOR: &str = "::";

/// A CSS selector, optionally paired with an attribute to extract
///
/// Written as `selector` (normalized text) or `selector::attribute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorRule {
    /// The CSS selector part
    pub selector: String,

    /// Attribute to read instead of text content
    pub attribute: Option<String>,
}

impl SelectorRule {
    /// Parses a rule string
    ///
    /// Only the first separator splits; the selector and attribute parts
    /// are trimmed and must both be non-empty.
    ///
    /// # Example
    ///
    /// ```
    /// use webscrape::extract::SelectorRule;
    ///
    /// let rule = SelectorRule::parse("a.title::href").unwrap();
    /// assert_eq!(rule.selector, "a.title");
    /// assert_eq!(rule.attribute.as_deref(), Some("href"));
    /// ```
    pub fn parse(rule: &str) -> Result<Self, String> {
        let (selector, attribute) = match rule.split_once(ATTRIBUTE_SEPARATOR) {
            Some((selector, attribute)) => (selector.trim(), Some(attribute.trim())),
            None => (rule.trim(), None),
        };

        if selector.is_empty() {
            return Err(format!("rule '{}' has an empty selector", rule));
        }

        if attribute == Some("") {
            return Err(format!("rule '{}' has an empty attribute name", rule));
        }

        Ok(Self {
            selector: selector.to_string(),
            attribute: attribute.map(str::to_string),
        })
    }

    /// Compiles the selector part for the given field
    pub fn compile(&self, field: &str) -> Result<CompiledRule, ConfigError> {
        Ok(CompiledRule {
            selector: compile_selector(field, &self.selector)?,
            attribute: self.attribute.clone(),
        })
    }
}

impl FromStr for SelectorRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attr) => write!(f, "{}{}{}", self.selector, ATTRIBUTE_SEPARATOR, attr),
            None => f.write_str(&self.selector),
        }
    }
}

/// A selector rule with its CSS selector already parsed
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub selector: Selector,
    pub attribute: Option<String>,
}

/// Parses a CSS selector, reporting failures against the owning field
pub fn compile_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        selector: selector.to_string(),
        message: e.to_string(),
    })
}
