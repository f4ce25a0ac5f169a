//! Extracts a uniform `(items, total)` page from whatever shape a list
//! endpoint returned.
//!
//! Precedence, first match wins:
//! 1. bare array
//! 2. `{"results": [...], "count": n}` (count optional)
//! 3. `{"data": [...], "total": n}` (total optional)
//! 4. the first field, in document order, holding an array
//! 5. nothing usable: empty page
//!
//! Step 4 relies on `serde_json`'s `preserve_order` feature.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// A normalized list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Which rule produced a `Page`, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Array,
    Results,
    Data,
    FirstArrayField,
    Unrecognized,
}

pub fn normalize(body: &Value) -> Page<Value> {
    normalize_with_shape(body).0
}

pub fn normalize_with_shape(body: &Value) -> (Page<Value>, Shape) {
    if let Value::Array(items) = body {
        return (page(items, None), Shape::Array);
    }
    let Value::Object(map) = body else {
        return (Page::default(), Shape::Unrecognized);
    };
    if let Some(Value::Array(items)) = map.get("results") {
        return (page(items, map.get("count")), Shape::Results);
    }
    if let Some(Value::Array(items)) = map.get("data") {
        return (page(items, map.get("total")), Shape::Data);
    }
    match map.values().find_map(Value::as_array) {
        Some(items) => (page(items, None), Shape::FirstArrayField),
        None => (Page::default(), Shape::Unrecognized),
    }
}

/// An explicit total wins only when it is a non-negative integer.
fn page(items: &[Value], total: Option<&Value>) -> Page<Value> {
    let total = total
        .and_then(Value::as_u64)
        .unwrap_or(items.len() as u64);
    Page {
        items: items.to_vec(),
        total,
    }
}

/// Normalize, then decode every item into `T`.
pub fn normalize_into<T: DeserializeOwned>(body: &Value) -> Result<Page<T>, ApiError> {
    let (raw, shape) = normalize_with_shape(body);
    tracing::debug!(?shape, items = raw.items.len(), total = raw.total, "normalized list response");
    let items = raw
        .items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    Ok(Page {
        items,
        total: raw.total,
    })
}
