//! # Topic records
//!
//! The full property tree the knowledge base returns for one identifier.
//! Accessors return `Option` per (property, index); every caller decides
//! what an absent value means.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One value of a topic property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TopicValue {
    /// Plain string.
    Text(String),
    /// Integer number.
    Int(i64),
    /// Floating point number.
    Double(f64),
    /// Boolean.
    Bool(bool),
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    /// Link to another topic, carrying its display text.
    Reference {
        /// Identifier of the referenced topic, when known.
        id: Option<String>,
        /// Display text of the referenced topic.
        text: String,
    },
    /// Nested record (e.g. a film performance under `starring`).
    Compound(TopicRecord),
}

impl TopicValue {
    /// Text content of string-like values (plain text and references).
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Reference { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Integer view. Doubles are truncated toward zero.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Double(value) if value.is_finite() => Some(value.trunc() as i64),
            _ => None,
        }
    }

    /// Floating point view of numeric values.
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// Epoch seconds of timestamp values.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    /// Nested record of compound values.
    #[must_use]
    pub fn as_record(&self) -> Option<&TopicRecord> {
        match self {
            Self::Compound(record) => Some(record),
            _ => None,
        }
    }
}

/// A tree of named properties, each holding zero or more values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Identifier of this record, if the source provided one.
    pub id: Option<String>,
    properties: BTreeMap<String, Vec<TopicValue>>,
}

impl TopicRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new(id: Option<String>) -> Self {
        Self {
            id,
            properties: BTreeMap::new(),
        }
    }

    /// Appends a value to `property`.
    pub fn push(&mut self, property: impl Into<String>, value: TopicValue) {
        self.properties.entry(property.into()).or_default().push(value);
    }

    /// Builder form of [`TopicRecord::push`].
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: TopicValue) -> Self {
        self.push(property, value);
        self
    }

    /// All values of `property`; empty when the property is absent.
    #[must_use]
    pub fn values(&self, property: &str) -> &[TopicValue] {
        self.properties
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The value at `index` of `property`.
    #[must_use]
    pub fn value(&self, property: &str, index: usize) -> Option<&TopicValue> {
        self.values(property).get(index)
    }

    /// Number of values of `property`.
    #[must_use]
    pub fn count(&self, property: &str) -> usize {
        self.values(property).len()
    }

    /// Text at `index` of `property`.
    #[must_use]
    pub fn text(&self, property: &str, index: usize) -> Option<&str> {
        self.value(property, index).and_then(TopicValue::as_text)
    }

    /// Integer at `index` of `property`, truncating doubles.
    #[must_use]
    pub fn int(&self, property: &str, index: usize) -> Option<i64> {
        self.value(property, index).and_then(TopicValue::as_int)
    }

    /// Number at `index` of `property`.
    #[must_use]
    pub fn double(&self, property: &str, index: usize) -> Option<f64> {
        self.value(property, index).and_then(TopicValue::as_double)
    }

    /// Epoch seconds at `index` of `property`.
    #[must_use]
    pub fn timestamp(&self, property: &str, index: usize) -> Option<i64> {
        self.value(property, index).and_then(TopicValue::as_timestamp)
    }

    /// Nested record at `index` of `property`.
    #[must_use]
    pub fn record(&self, property: &str, index: usize) -> Option<&TopicRecord> {
        self.value(property, index).and_then(TopicValue::as_record)
    }

    /// Iterates over property names in sorted order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Returns `true` if the record has no properties at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
