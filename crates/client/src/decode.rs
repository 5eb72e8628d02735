//! Defensive decoding of list responses.
//!
//! Endpoints answer with a bare array or with an object wrapping the array in
//! `data` (or `items`) next to a `total`. Records that fail to decode are
//! skipped with a warning instead of failing the whole page.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// One page of records plus the backend's total count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected an array or an object with a data array, got {0}")]
    UnexpectedShape(&'static str),
}

pub fn decode_page<T: DeserializeOwned>(resource: &str, value: Value) -> Result<Page<T>, DecodeError> {
    let (items, total) = match value {
        Value::Array(items) => (items, None),
        Value::Object(mut map) => {
            let items = match map.remove("data").or_else(|| map.remove("items")) {
                Some(Value::Array(items)) => items,
                _ => return Err(DecodeError::UnexpectedShape("object without data array")),
            };
            let total = ["total", "totalCount", "count"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_u64))
                .or_else(|| {
                    map.get("meta")
                        .and_then(|meta| meta.get("total"))
                        .and_then(Value::as_u64)
                });
            (items, total)
        }
        Value::Null => return Err(DecodeError::UnexpectedShape("null")),
        Value::Bool(_) => return Err(DecodeError::UnexpectedShape("boolean")),
        Value::Number(_) => return Err(DecodeError::UnexpectedShape("number")),
        Value::String(_) => return Err(DecodeError::UnexpectedShape("string")),
    };

    let received = items.len();
    let data: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(resource, index, error = %err, "skipping malformed record");
                None
            }
        })
        .collect();

    let total = match total {
        Some(total) => usize::try_from(total).unwrap_or(usize::MAX),
        None => data.len(),
    };
    if data.len() < received {
        tracing::debug!(resource, received, decoded = data.len(), "page decoded with skips");
    }

    Ok(Page { data, total })
}

/// Unwrap `{ "data": {...} }` envelopes around single objects.
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
