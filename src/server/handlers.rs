use crate::config::Settings;
use crate::core::etl::run_dataset;
use crate::core::export::{export_filename, render_html_table, to_csv};
use crate::core::rooms::{ROOM_ROW, ROOM_TYPE_ROW};
use crate::domain::model::{Credentials, Dataset, Table};
use crate::server::AppState;
use crate::utils::error::{ReportError, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const INDEX_HTML: &str = include_str!("index.html");

/// Envelope every `/api` route answers with.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            error: None,
            data: None,
        })
    }

    fn data(data: Value) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            error: None,
            data: Some(data),
        })
    }

    fn error(error: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: None,
            error: Some(error.into()),
            data: None,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveSettingsRequest {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionQuery {
    pub access_token: Option<String>,
    pub property_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DatasetQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl DatasetQuery {
    fn dataset(&self) -> Option<Dataset> {
        Dataset::parse(self.kind.as_deref().unwrap_or("sources"))
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn save_settings(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SaveSettingsRequest>, JsonRejection>,
) -> Json<ApiResponse> {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiResponse::error(rejection.body_text()),
    };

    let settings = Settings::new(
        request.access_token.as_deref().unwrap_or_default(),
        request.property_id.as_deref().unwrap_or_default(),
    );
    match state.settings.save(&settings).await {
        Ok(()) => ApiResponse::message("Settings saved successfully!"),
        Err(e) => {
            tracing::error!("❌ Saving settings failed: {}", e);
            ApiResponse::error(e.user_friendly_message())
        }
    }
}

pub async fn get_settings(State(state): State<AppState>) -> Json<ApiResponse> {
    let settings = state.settings.load().await;
    ApiResponse::data(json!({
        "access_token": settings.access_token,
        "property_id": settings.property_id,
    }))
}

/// Form values win when both are given; otherwise the saved settings are used.
pub async fn test_connection(
    State(state): State<AppState>,
    Query(query): Query<ConnectionQuery>,
) -> Json<ApiResponse> {
    let form = match (query.access_token.as_deref(), query.property_id.as_deref()) {
        (Some(token), Some(property)) if !token.trim().is_empty() && !property.trim().is_empty() => {
            Some(Settings::new(token, property))
        }
        _ => None,
    };
    let settings = match form {
        Some(settings) => settings,
        None => state.settings.load().await,
    };

    let result = match settings.credentials() {
        Ok(credentials) => state.client.test_connection(&credentials).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ApiResponse::message("Connection successful!"),
        Err(e) => {
            tracing::warn!("⚠️ Connection test failed: {}", e);
            ApiResponse::error(e.user_friendly_message())
        }
    }
}

async fn load_table(state: &AppState, dataset: Dataset) -> Result<(Credentials, Table)> {
    let credentials = state.settings.load().await.credentials()?;
    let table = run_dataset(&*state.client, dataset, credentials.clone()).await?;
    Ok((credentials, table))
}

fn data_error(e: &ReportError) -> Json<ApiResponse> {
    match e {
        ReportError::MissingCredentialsError => ApiResponse::error(e.to_string()),
        other => {
            tracing::error!("❌ {}", other);
            ApiResponse::error(other.user_friendly_message())
        }
    }
}

pub async fn sources(State(state): State<AppState>) -> Json<ApiResponse> {
    match load_table(&state, Dataset::Sources).await {
        Ok((_, table)) => ApiResponse::data(json!({
            "sources": table.to_objects(),
            "columns": table.columns,
            "count": table.len(),
        })),
        Err(e) => data_error(&e),
    }
}

pub async fn taxes_fees(State(state): State<AppState>) -> Json<ApiResponse> {
    match load_table(&state, Dataset::TaxesFees).await {
        Ok((_, table)) => ApiResponse::data(json!({
            "items": table.to_objects(),
            "columns": table.columns,
            "count": table.len(),
        })),
        Err(e) => data_error(&e),
    }
}

pub async fn rooms(State(state): State<AppState>) -> Json<ApiResponse> {
    match load_table(&state, Dataset::Rooms).await {
        Ok((_, table)) => ApiResponse::data(json!({
            "items": table.to_objects(),
            "room_types_count": table.count_where("data_type", ROOM_TYPE_ROW),
            "rooms_count": table.count_where("data_type", ROOM_ROW),
            "columns": table.columns,
            "count": table.len(),
        })),
        Err(e) => data_error(&e),
    }
}

fn status_for(e: &ReportError) -> StatusCode {
    match e {
        ReportError::MissingCredentialsError => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// HTML table fragment for the page.
pub async fn table(State(state): State<AppState>, Query(query): Query<DatasetQuery>) -> Response {
    let Some(dataset) = query.dataset() else {
        return (StatusCode::BAD_REQUEST, "Invalid data type").into_response();
    };

    match load_table(&state, dataset).await {
        Ok((_, table)) => Html(render_html_table(&table)).into_response(),
        Err(e) => (status_for(&e), format!("Error: {}", e.user_friendly_message())).into_response(),
    }
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<DatasetQuery>,
) -> Response {
    if state.settings.load().await.credentials().is_err() {
        return (StatusCode::BAD_REQUEST, "Access token not configured").into_response();
    }
    let Some(dataset) = query.dataset() else {
        return (StatusCode::BAD_REQUEST, "Invalid data type").into_response();
    };

    let (credentials, table) = match load_table(&state, dataset).await {
        Ok(loaded) => loaded,
        Err(e) => {
            return (status_for(&e), format!("Error: {}", e.user_friendly_message()))
                .into_response()
        }
    };
    if table.is_empty() {
        return (StatusCode::NOT_FOUND, "No data to export").into_response();
    }

    let csv = match to_csv(&table) {
        Ok(csv) => csv,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Export error: {}", e),
            )
                .into_response()
        }
    };

    let filename = export_filename(dataset, &credentials.property_id, &chrono::Local::now());
    tracing::info!("📁 Exporting {} rows as {}", table.len(), filename);
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        csv,
    )
        .into_response()
}
