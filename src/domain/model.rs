use serde::{Deserialize, Serialize};

/// One JSON object as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }
}

/// Access token and property resolved for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub property_id: String,
}

/// Flattened rows with a fixed column order. Every row has `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as column-name keyed objects, the shape the page script consumes.
    pub fn to_objects(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(col, cell)| (col.clone(), serde_json::Value::String(cell.clone())))
                    .collect()
            })
            .collect()
    }

    pub fn count_where(&self, column: &str, value: &str) -> usize {
        match self.columns.iter().position(|c| c == column) {
            Some(idx) => self.rows.iter().filter(|row| row[idx] == value).count(),
            None => 0,
        }
    }
}

/// The datasets the tool can load and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Sources,
    TaxesFees,
    Rooms,
}

impl Dataset {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sources" => Some(Dataset::Sources),
            "taxes-fees" => Some(Dataset::TaxesFees),
            "rooms" => Some(Dataset::Rooms),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Sources => "sources",
            Dataset::TaxesFees => "taxes-fees",
            Dataset::Rooms => "rooms",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Dataset::Sources => "cloudbeds_sources",
            Dataset::TaxesFees => "cloudbeds_taxes_fees",
            Dataset::Rooms => "cloudbeds_rooms",
        }
    }
}
