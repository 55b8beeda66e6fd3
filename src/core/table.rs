use crate::domain::model::Table;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Columns that lead the table whenever they are present.
pub const PRIORITY_COLUMNS: [&str; 8] = [
    "data_type",
    "propertyID",
    "sourceID",
    "sourceName",
    "roomtype_roomTypeID",
    "roomtype_roomTypeName",
    "room_roomID",
    "room_roomName",
];

pub type Row = HashMap<String, String>;

/// Text shown in a cell: strings verbatim, scalars as JSON text, nested values as compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Priority columns first (when present), then the rest in lexical order.
pub fn order_columns(rows: &[Row]) -> Vec<String> {
    let mut remaining: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut columns = Vec::with_capacity(remaining.len());
    for col in PRIORITY_COLUMNS {
        if remaining.remove(col) {
            columns.push(col.to_string());
        }
    }
    columns.extend(remaining.into_iter().map(str::to_string));
    columns
}

/// Lays `rows` out under `columns`; absent cells become empty strings.
pub fn normalize(rows: Vec<Row>, columns: Vec<String>) -> Table {
    let rows = rows
        .into_iter()
        .map(|mut row| {
            columns
                .iter()
                .map(|col| row.remove(col).unwrap_or_default())
                .collect()
        })
        .collect();
    Table { columns, rows }
}

pub fn table_from_rows(rows: Vec<Row>) -> Table {
    let columns = order_columns(&rows);
    normalize(rows, columns)
}
