use crate::core::client::ApiClient;
use crate::core::rooms::RoomsReport;
use crate::core::sources::SourcesReport;
use crate::core::taxes_fees::TaxesFeesReport;
use crate::domain::model::{Credentials, Dataset, Table};
use crate::domain::ports::{ConfigProvider, ReportPipeline};
use crate::utils::error::Result;
use std::time::Instant;

pub struct ReportEngine<P: ReportPipeline> {
    pipeline: P,
}

impl<P: ReportPipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<Table> {
        let started = Instant::now();
        let name = self.pipeline.name();

        let raw = self.pipeline.extract().await.inspect_err(|e| {
            tracing::error!("❌ Extracting {} failed: {}", name, e);
        })?;

        let table = self.pipeline.transform(raw).await?;
        tracing::info!(
            "✅ {}: {} rows x {} columns in {:?}",
            name,
            table.len(),
            table.columns.len(),
            started.elapsed()
        );

        Ok(table)
    }
}

/// Builds the table for `dataset` with the pipeline that serves it.
pub async fn run_dataset<C: ConfigProvider>(
    client: &ApiClient<C>,
    dataset: Dataset,
    credentials: Credentials,
) -> Result<Table> {
    tracing::debug!("Building {} table", dataset.as_str());
    match dataset {
        Dataset::Sources => {
            ReportEngine::new(SourcesReport::new(client, credentials))
                .run()
                .await
        }
        Dataset::TaxesFees => {
            ReportEngine::new(TaxesFeesReport::new(client, credentials))
                .run()
                .await
        }
        Dataset::Rooms => {
            ReportEngine::new(RoomsReport::new(client, credentials))
                .run()
                .await
        }
    }
}
