use crate::core::extract::{extract_records, reported_total};
use crate::domain::model::{Credentials, Record};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use reqwest::{header, Client, StatusCode};
use serde_json::Value;

pub const SOURCES_PATH: &str = "getSources";
pub const TAXES_FEES_PATH: &str = "getTaxesAndFees";
pub const ROOM_TYPES_PATH: &str = "getRoomTypes";
pub const ROOMS_PATH: &str = "getRooms";

/// Thin client over the Cloudbeds REST API with bounded retry and pagination.
pub struct ApiClient<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> ApiClient<C> {
    pub fn new(config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base_url().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET with the bearer token; transient failures are retried with a fixed delay.
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
        credentials: &Credentials,
    ) -> Result<Value> {
        let url = self.endpoint(path);
        let max_attempts = self.config.retry_attempts() + 1;
        let mut attempt = 1;

        loop {
            match self.send_once(&url, params, credentials).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    tracing::warn!(
                        "🔁 {} failed (attempt {}/{}): {}; retrying in {:?}",
                        path,
                        attempt,
                        max_attempts,
                        e,
                        self.config.retry_delay()
                    );
                    tokio::time::sleep(self.config.retry_delay()).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        params: &[(&str, String)],
        credentials: &Credentials,
    ) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&credentials.access_token)
            .header(header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("🔗 API call to {} - Status: {}", url, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::api(status.as_u16(), error_message(status, &body)));
        }

        let body: Value = response.json().await?;
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("API request was not successful");
            return Err(ReportError::api(status.as_u16(), message));
        }

        Ok(body)
    }

    /// Single unpaginated call for `propertyID`.
    pub async fn fetch_once(&self, path: &str, credentials: &Credentials) -> Result<Value> {
        let params = [("propertyID", credentials.property_id.clone())];
        self.get_json(path, &params, credentials).await
    }

    /// Fetches every page of `path` in order and concatenates the records.
    ///
    /// Stops on an empty page, once a reported `total` has been collected, on a short
    /// page, on a page identical to the previous one, or after `max_pages`.
    pub async fn fetch_all_pages(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<Vec<Record>> {
        let page_size = self.config.page_size();
        let max_pages = self.config.max_pages();
        let mut records: Vec<Record> = Vec::new();
        let mut previous_page: Option<Vec<Record>> = None;

        for page_number in 1..=max_pages {
            let params = [
                ("propertyID", credentials.property_id.clone()),
                ("pageNumber", page_number.to_string()),
                ("pageSize", page_size.to_string()),
            ];
            let body = self.get_json(path, &params, credentials).await?;
            let page = extract_records(&body);
            tracing::debug!("📄 {} page {}: {} records", path, page_number, page.len());

            if page.is_empty() {
                break;
            }
            if previous_page.as_ref() == Some(&page) {
                tracing::warn!(
                    "⚠️ {} returned the same records for page {}; pagination looks unsupported",
                    path,
                    page_number
                );
                break;
            }

            let page_len = page.len();
            records.extend(page.iter().cloned());

            if let Some(total) = reported_total(&body) {
                if records.len() >= total {
                    break;
                }
            }
            if page_len < page_size {
                break;
            }
            if page_number == max_pages {
                tracing::warn!(
                    "⚠️ Stopped {} after {} pages ({} records)",
                    path,
                    max_pages,
                    records.len()
                );
            }
            previous_page = Some(page);
        }

        tracing::info!("📊 Fetched {} records from {}", records.len(), path);
        Ok(records)
    }

    /// One `getSources` call; succeeds when the token is accepted.
    pub async fn test_connection(&self, credentials: &Credentials) -> Result<()> {
        self.fetch_once(SOURCES_PATH, credentials).await.map(|_| ())
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
