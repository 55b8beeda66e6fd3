pub mod client;
pub mod etl;
pub mod export;
pub mod extract;
pub mod rooms;
pub mod sources;
pub mod table;
pub mod taxes_fees;

pub use crate::domain::model::{Credentials, Dataset, Record, Table};
pub use crate::domain::ports::{ConfigProvider, ReportPipeline, Storage};
pub use crate::utils::error::Result;
