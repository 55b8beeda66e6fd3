use crate::core::client::{ApiClient, ROOMS_PATH, ROOM_TYPES_PATH};
use crate::core::extract::extract_records;
use crate::core::table::{cell_text, table_from_rows, Row};
use crate::domain::model::{Credentials, Record, Table};
use crate::domain::ports::{ConfigProvider, ReportPipeline};
use crate::utils::error::{ReportError, Result};
use serde_json::Value;

pub const ROOM_TYPE_ROW: &str = "Room Type";
pub const ROOM_ROW: &str = "Room";

#[derive(Debug, Clone, Default)]
pub struct RoomsData {
    pub room_types: Vec<Record>,
    pub rooms: Vec<Record>,
}

/// Room types, each followed by the rooms that belong to it.
pub struct RoomsReport<'a, C: ConfigProvider> {
    client: &'a ApiClient<C>,
    credentials: Credentials,
}

impl<'a, C: ConfigProvider> RoomsReport<'a, C> {
    pub fn new(client: &'a ApiClient<C>, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl<'a, C: ConfigProvider> ReportPipeline for RoomsReport<'a, C> {
    type Raw = RoomsData;

    fn name(&self) -> &str {
        "rooms"
    }

    async fn extract(&self) -> Result<RoomsData> {
        tracing::info!(
            "🚀 Fetching rooms for property {}",
            self.credentials.property_id
        );

        let room_types = self
            .client
            .fetch_once(ROOM_TYPES_PATH, &self.credentials)
            .await
            .map_err(|e| prefix_error("Room types", e))?;
        let rooms = self
            .client
            .fetch_once(ROOMS_PATH, &self.credentials)
            .await
            .map_err(|e| prefix_error("Rooms", e))?;

        Ok(RoomsData {
            room_types: extract_records(&room_types),
            rooms: extract_rooms(&rooms),
        })
    }

    async fn transform(&self, raw: RoomsData) -> Result<Table> {
        Ok(flatten_rooms(&raw))
    }
}

fn prefix_error(what: &str, error: ReportError) -> ReportError {
    match error {
        ReportError::ApiError { status, message } => ReportError::ApiError {
            status,
            message: format!("{}: {}", what, message),
        },
        other => other,
    }
}

/// `getRooms` groups rooms per property: `{"data": [{"propertyID": .., "rooms": [..]}]}`.
pub fn extract_rooms(body: &Value) -> Vec<Record> {
    let mut rooms = Vec::new();
    for entry in extract_records(body) {
        if let Some(Value::Array(property_rooms)) = entry.get("rooms") {
            tracing::debug!(
                "🔍 Extracted {} rooms from property {}",
                property_rooms.len(),
                entry.get("propertyID").map(cell_text).unwrap_or_default()
            );
            rooms.extend(property_rooms.iter().filter_map(|room| match room {
                Value::Object(obj) => Some(Record::new(obj.clone())),
                _ => None,
            }));
        } else if entry.get("roomID").is_some() {
            rooms.push(entry);
        }
    }
    rooms
}

fn prefixed(row: &mut Row, prefix: &str, record: &Record) {
    for (key, value) in &record.data {
        row.insert(format!("{}_{}", prefix, key), cell_text(value));
    }
}

/// Room ids are matched as text since the API mixes numbers and strings.
pub fn flatten_rooms(data: &RoomsData) -> Table {
    let mut rows = Vec::new();

    for room_type in &data.room_types {
        let room_type_id = room_type.get("roomTypeID").map(cell_text).unwrap_or_default();

        let mut type_row = Row::new();
        type_row.insert("data_type".to_string(), ROOM_TYPE_ROW.to_string());
        prefixed(&mut type_row, "roomtype", room_type);
        rows.push(type_row);

        let matching = data.rooms.iter().filter(|room| {
            room.get("roomTypeID").map(cell_text).unwrap_or_default() == room_type_id
        });
        for room in matching {
            let mut room_row = Row::new();
            room_row.insert("data_type".to_string(), ROOM_ROW.to_string());
            prefixed(&mut room_row, "roomtype", room_type);
            prefixed(&mut room_row, "room", room);
            rows.push(room_row);
        }
    }

    tracing::debug!("📊 Total processed room rows: {}", rows.len());
    table_from_rows(rows)
}
