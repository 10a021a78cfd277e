use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of one field in a record
///
/// Serializes as `null`, a string, or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The selector matched nothing
    Absent,
    /// The selector matched exactly one element
    Single(String),
    /// The selector matched several elements, in document order
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Builds a value from the per-element values of all matches
    pub fn from_matches(mut values: Vec<String>) -> Self {
        match values.len() {
            0 => Self::Absent,
            1 => Self::Single(values.remove(0)),
            _ => Self::Multiple(values),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The single value, if exactly one element matched
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            _ => None,
        }
    }

    /// All matched values in document order (empty when absent)
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Absent => Vec::new(),
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Number of elements that matched
    pub fn match_count(&self) -> usize {
        match self {
            Self::Absent => 0,
            Self::Single(_) => 1,
            Self::Multiple(values) => values.len(),
        }
    }
}

/// One extracted record: field name to value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if every field came back absent
    pub fn all_absent(&self) -> bool {
        self.fields.values().all(FieldValue::is_absent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
