//! Record extraction
//!
//! This module turns one parsed HTML document plus a set of selector rules
//! into an ordered list of records:
//! - Parsing `selector::attribute` rules
//! - Scoping extraction to repeated container elements
//! - Normalizing zero/one/many matches into a `FieldValue`

mod extractor;
mod record;
mod rule;

pub use extractor::{element_text, ExtractionPlan};
pub use record::{FieldValue, Record};
pub use rule::{compile_selector, CompiledRule, SelectorRule, ATTRIBUTE_SEPARATOR};
