pub mod settings;
pub mod toml_config;

pub use settings::{Settings, SettingsStore};
pub use toml_config::{ApiConfig, AppConfig, ServerConfig};

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cloudbeds-reports")]
#[command(about = "Local web app for Cloudbeds sources, taxes & fees and rooms reports")]
pub struct CliConfig {
    /// Optional TOML file with [api] and [server] tuning
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Settings file holding the access token and property ID
    #[arg(long)]
    pub settings_file: Option<String>,

    #[arg(long, help = "Do not open the browser on startup")]
    pub no_browser: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the TOML file (if any) and applies command-line overrides on top.
    pub fn resolve(&self) -> crate::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.settings_file {
            config.server.settings_file = Some(path.clone());
        }
        if self.no_browser {
            config.server.open_browser = false;
        }

        Ok(config)
    }
}
