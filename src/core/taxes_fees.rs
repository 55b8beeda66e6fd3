use crate::core::client::{ApiClient, TAXES_FEES_PATH};
use crate::core::extract::extract_records;
use crate::core::table::{cell_text, table_from_rows, Row};
use crate::domain::model::{Credentials, Record, Table};
use crate::domain::ports::{ConfigProvider, ReportPipeline};
use crate::utils::error::Result;

/// Taxes and fees configured for a property; every top-level key is a column.
pub struct TaxesFeesReport<'a, C: ConfigProvider> {
    client: &'a ApiClient<C>,
    credentials: Credentials,
}

impl<'a, C: ConfigProvider> TaxesFeesReport<'a, C> {
    pub fn new(client: &'a ApiClient<C>, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl<'a, C: ConfigProvider> ReportPipeline for TaxesFeesReport<'a, C> {
    type Raw = Vec<Record>;

    fn name(&self) -> &str {
        "taxes-fees"
    }

    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::info!(
            "🚀 Fetching taxes/fees for property {}",
            self.credentials.property_id
        );
        let body = self
            .client
            .fetch_once(TAXES_FEES_PATH, &self.credentials)
            .await?;
        Ok(extract_records(&body))
    }

    async fn transform(&self, raw: Vec<Record>) -> Result<Table> {
        Ok(flatten_taxes_fees(&raw))
    }
}

pub fn flatten_taxes_fees(items: &[Record]) -> Table {
    let rows: Vec<Row> = items
        .iter()
        .map(|item| {
            item.data
                .iter()
                .map(|(key, value)| (key.clone(), cell_text(value)))
                .collect()
        })
        .collect();
    table_from_rows(rows)
}
