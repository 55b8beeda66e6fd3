//! Pulling records out of Cloudbeds response envelopes.
//!
//! The API wraps results as `{"success": true, "data": ...}` where `data` is a list
//! of objects, a list holding one or more lists of objects, or a single object.

use crate::domain::model::Record;
use serde_json::Value;

pub fn extract_records(body: &Value) -> Vec<Record> {
    let payload = match body {
        Value::Object(obj) => match obj.get("data") {
            Some(data) => data,
            None => return Vec::new(),
        },
        other => other,
    };

    let mut records = Vec::new();
    match payload {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::Array(inner) => collect_objects(inner, &mut records),
                    Value::Object(obj) => records.push(Record::new(obj.clone())),
                    other => skip(index, other),
                }
            }
        }
        Value::Object(obj) => records.push(Record::new(obj.clone())),
        Value::Null => {}
        other => skip(0, other),
    }
    records
}

fn collect_objects(items: &[Value], records: &mut Vec<Record>) {
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(obj) => records.push(Record::new(obj.clone())),
            other => skip(index, other),
        }
    }
}

fn skip(index: usize, value: &Value) {
    tracing::warn!("⚠️ Skipping non-object entry at index {}: {}", index, value);
}

/// The `total` a paginated response reports, as a number or numeric string.
pub fn reported_total(body: &Value) -> Option<usize> {
    match body.get("total")? {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
