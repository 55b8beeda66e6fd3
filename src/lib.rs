pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use config::{AppConfig, Settings, SettingsStore};
pub use self::core::{client::ApiClient, etl::ReportEngine};
pub use utils::error::{ReportError, Result};
