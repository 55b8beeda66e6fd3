use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudbeds.com/api/v1.3";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub page_size: usize,
    pub max_pages: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: 30,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            page_size: 100,
            max_pages: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
    pub browser_delay_ms: u64,
    /// Overrides `~/.cloudbeds_sources_config.json`.
    pub settings_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            open_browser: true,
            browser_delay_ms: 1500,
            settings_file: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_positive_number("api.page_size", self.api.page_size, 1)?;
        validation::validate_positive_number("api.max_pages", self.api.max_pages, 1)?;
        validation::validate_range("api.retry_attempts", self.api.retry_attempts, 0, 10)?;
        validation::validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        if let Some(path) = &self.server.settings_file {
            validation::validate_path("server.settings_file", path)?;
        }
        Ok(())
    }
}

impl ConfigProvider for ApiConfig {
    fn api_base_url(&self) -> &str {
        &self.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn max_pages(&self) -> usize {
        self.max_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.server.port, 5000);
        assert!(config.server.open_browser);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[api]
page_size = 25
retry_attempts = 1

[server]
port = 5050
open_browser = false
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api.page_size, 25);
        assert_eq!(config.api.retry_attempts, 1);
        assert_eq!(config.api.max_pages, 1000);
        assert_eq!(config.server.port, 5050);
        assert!(!config.server.open_browser);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CLOUDBEDS_TEST_BASE_URL", "https://sandbox.example.com/api/v1.3");

        let toml_content = r#"
[api]
base_url = "${CLOUDBEDS_TEST_BASE_URL}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://sandbox.example.com/api/v1.3");

        std::env::remove_var("CLOUDBEDS_TEST_BASE_URL");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[api]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[api]
page_size = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nhost = \"localhost\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.host, "localhost");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ReportError::ConfigValidationError { .. }));
    }
}
