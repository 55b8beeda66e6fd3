use crate::domain::model::Table;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// Tuning for the outbound API client.
pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn page_size(&self) -> usize;
    fn max_pages(&self) -> usize;
}

/// One dataset: fetch the raw records, then flatten them into a table.
#[async_trait]
pub trait ReportPipeline: Send + Sync {
    type Raw: Send;

    fn name(&self) -> &str;
    async fn extract(&self) -> Result<Self::Raw>;
    async fn transform(&self, raw: Self::Raw) -> Result<Table>;
}
