//! # Wire format
//!
//! Response payloads of the Freebase-style JSON API and their decoding into
//! [`TopicRecord`] trees. Values are typed by the property's `valuetype`;
//! values that carry nothing usable for their type are dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use mediaminer_core::{ExternalId, TopicRecord, TopicValue};
use serde::Deserialize;
use serde_json::Value;

use crate::client::SearchHit;

#[derive(Debug, Deserialize)]
pub(crate) struct MqlResponse {
    #[serde(default)]
    pub result: Option<Vec<MqlItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MqlItem {
    #[serde(default)]
    pub id: Option<String>,
}

impl MqlResponse {
    pub fn into_ids(self) -> Vec<ExternalId> {
        self.result
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| item.id)
            .filter(|id| !id.is_empty())
            .map(ExternalId::new)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub result: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl SearchResponse {
    pub fn into_hits(self) -> Vec<SearchHit> {
        self.result
            .unwrap_or_default()
            .into_iter()
            .map(|item| SearchHit {
                id: item
                    .mid
                    .or(item.id)
                    .filter(|id| !id.is_empty())
                    .map(ExternalId::new),
                name: item.name,
                score: item.score.unwrap_or(0.0),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TopicResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub property: BTreeMap<String, WireProperty>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireProperty {
    #[serde(default)]
    pub valuetype: Option<String>,
    #[serde(default)]
    pub values: Vec<WireValue>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireValue {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub property: BTreeMap<String, WireProperty>,
}

impl TopicResponse {
    pub fn into_record(self) -> TopicRecord {
        decode_properties(self.id, self.property)
    }
}

fn decode_properties(id: Option<String>, properties: BTreeMap<String, WireProperty>) -> TopicRecord {
    let mut record = TopicRecord::new(id);
    for (name, property) in properties {
        let valuetype = property.valuetype.as_deref().unwrap_or("string");
        for value in property.values {
            if let Some(value) = decode_value(valuetype, value) {
                record.push(name.clone(), value);
            }
        }
    }
    record
}

fn decode_value(valuetype: &str, wire: WireValue) -> Option<TopicValue> {
    match valuetype {
        "compound" => Some(TopicValue::Compound(decode_properties(wire.id, wire.property))),
        "object" => {
            let text = wire.text.or_else(|| value_text(wire.value.as_ref()))?;
            Some(TopicValue::Reference { id: wire.id, text })
        }
        "int" => {
            let int = match wire.value.as_ref() {
                Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
                _ => wire.text.as_deref().and_then(|t| t.trim().parse().ok()),
            };
            int.map(TopicValue::Int)
        }
        "float" => {
            let float = match wire.value.as_ref() {
                Some(Value::Number(n)) => n.as_f64(),
                _ => wire.text.as_deref().and_then(|t| t.trim().parse().ok()),
            };
            float.map(TopicValue::Double)
        }
        "bool" => match wire.value.as_ref() {
            Some(Value::Bool(b)) => Some(TopicValue::Bool(*b)),
            _ => wire.text.as_deref().and_then(|t| t.parse().ok()).map(TopicValue::Bool),
        },
        "datetime" => {
            let secs = match wire.value.as_ref() {
                Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
                Some(Value::String(s)) => parse_datetime(s),
                _ => wire.text.as_deref().and_then(parse_datetime),
            };
            secs.map(TopicValue::Timestamp)
        }
        _ => {
            let text = value_text(wire.value.as_ref()).or(wire.text)?;
            Some(TopicValue::Text(text))
        }
    }
}

fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses RFC 3339 timestamps and the truncated date forms `YYYY`,
/// `YYYY-MM` and `YYYY-MM-DD` into epoch seconds (UTC midnight).
pub(crate) fn parse_datetime(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.timestamp());
    }

    let padded = match text.len() {
        4 => format!("{text}-01-01"),
        7 => format!("{text}-01"),
        _ => text.to_string(),
    };
    let date = NaiveDate::parse_from_str(&padded, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}
