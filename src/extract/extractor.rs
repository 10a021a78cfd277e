//! Record extraction from a parsed document
//!
//! Extraction is a pure function of (document, plan): no network access and
//! no pagination state.

use crate::extract::record::{FieldValue, Record};
use crate::extract::rule::{compile_selector, CompiledRule, SelectorRule};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Field name used in error messages for the container selector
const CONTAINER_FIELD: &str = "container";

/// Compiled extraction rules for one configuration
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    container: Option<Selector>,
    fields: Vec<(String, CompiledRule)>,
    skip_empty_records: bool,
}

/// Where a field selector is evaluated
enum Scope<'a> {
    Document(&'a Html),
    Element(ElementRef<'a>),
}

impl<'a> Scope<'a> {
    fn select(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        match self {
            Scope::Document(document) => document.select(selector).collect(),
            Scope::Element(element) => element.select(selector).collect(),
        }
    }
}

impl ExtractionPlan {
    /// Compiles the container selector and field rules
    ///
    /// # Arguments
    ///
    /// * `container` - Optional selector marking record boundaries
    /// * `fields` - Field name and rule string pairs
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractionPlan)` - All selectors parsed
    /// * `Err(ConfigError)` - A rule or selector was malformed
    pub fn compile<'f>(
        container: Option<&str>,
        fields: impl IntoIterator<Item = (&'f str, &'f str)>,
    ) -> Result<Self, ConfigError> {
        let container = container
            .map(|selector| compile_selector(CONTAINER_FIELD, selector))
            .transpose()?;

        let mut compiled = Vec::new();
        for (name, rule) in fields {
            let parsed = SelectorRule::parse(rule).map_err(|message| {
                ConfigError::InvalidSelector {
                    field: name.to_string(),
                    selector: rule.to_string(),
                    message,
                }
            })?;
            compiled.push((name.to_string(), parsed.compile(name)?));
        }

        Ok(Self {
            container,
            fields: compiled,
            skip_empty_records: false,
        })
    }

    /// Drops records whose fields all came back absent
    pub fn skip_empty_records(mut self, skip: bool) -> Self {
        self.skip_empty_records = skip;
        self
    }

    /// Names of the fields every record carries
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Extracts records from a parsed document
    ///
    /// With a container selector, one record is produced per matching
    /// element in document order; no matching container means no records.
    /// Without one, the whole document is a single container.
    pub fn extract(&self, document: &Html) -> Vec<Record> {
        let scopes: Vec<Scope<'_>> = match &self.container {
            Some(container) => document.select(container).map(Scope::Element).collect(),
            None => vec![Scope::Document(document)],
        };

        scopes
            .iter()
            .map(|scope| self.extract_record(scope))
            .filter(|record| !record.is_empty())
            .filter(|record| !(self.skip_empty_records && record.all_absent()))
            .collect()
    }

    /// Parses an HTML string and extracts its records
    pub fn extract_html(&self, html: &str) -> Vec<Record> {
        self.extract(&Html::parse_document(html))
    }

    fn extract_record(&self, scope: &Scope<'_>) -> Record {
        self.fields
            .iter()
            .map(|(name, rule)| {
                let values = scope
                    .select(&rule.selector)
                    .into_iter()
                    .map(|element| element_value(element, rule.attribute.as_deref()))
                    .collect();
                (name.clone(), FieldValue::from_matches(values))
            })
            .collect()
    }
}

/// Value of one matched element: an attribute, or its normalized text
fn element_value(element: ElementRef<'_>, attribute: Option<&str>) -> String {
    match attribute {
        Some(attr) => element.value().attr(attr).unwrap_or_default().to_string(),
        None => element_text(element),
    }
}

/// Text content of an element with whitespace runs collapsed to one space
pub fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
