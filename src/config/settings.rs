//! User settings persisted between runs: the Cloudbeds access token and the
//! property the reports are pulled for.

use crate::adapters::LocalStorage;
use crate::domain::model::Credentials;
use crate::domain::ports::Storage;
use crate::utils::error::{ReportError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = ".cloudbeds_sources_config.json";
pub const DEFAULT_PROPERTY_ID: &str = "6000";

fn default_property_id() -> String {
    DEFAULT_PROPERTY_ID.to_string()
}

/// Scalars are kept as text so a hand-edited `"property_id": 6000` still loads.
fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn property_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(deserializer)?
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(default_property_id))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "scalar_text")]
    pub access_token: Option<String>,
    #[serde(default = "default_property_id", deserialize_with = "property_text")]
    pub property_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            access_token: None,
            property_id: default_property_id(),
        }
    }
}

impl Settings {
    pub fn new(access_token: &str, property_id: &str) -> Self {
        let access_token = access_token.trim();
        let property_id = property_id.trim();
        Self {
            access_token: (!access_token.is_empty()).then(|| access_token.to_string()),
            property_id: if property_id.is_empty() {
                default_property_id()
            } else {
                property_id.to_string()
            },
        }
    }

    /// Fails with `MissingCredentialsError` when no token has been saved.
    pub fn credentials(&self) -> Result<Credentials> {
        match self.access_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(Credentials {
                access_token: token.to_string(),
                property_id: self.property_id.trim().to_string(),
            }),
            _ => Err(ReportError::MissingCredentialsError),
        }
    }
}

/// Resolves `~/.cloudbeds_sources_config.json`.
pub fn default_settings_path() -> Result<PathBuf> {
    let base_dirs = directories::BaseDirs::new().ok_or_else(|| ReportError::ConfigError {
        message: "could not resolve home directory".to_string(),
    })?;
    Ok(base_dirs.home_dir().join(SETTINGS_FILE_NAME))
}

pub struct SettingsStore<S: Storage> {
    storage: S,
    file_name: String,
}

impl SettingsStore<LocalStorage> {
    /// Store backed by a single file on disk.
    pub fn at_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| SETTINGS_FILE_NAME.to_string());
        Self::new(LocalStorage::new(base), file_name)
    }

    pub fn path(&self) -> PathBuf {
        self.storage.base_path().join(&self.file_name)
    }
}

impl<S: Storage> SettingsStore<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }

    /// Missing or unreadable settings fall back to defaults.
    pub async fn load(&self) -> Settings {
        if !self.storage.exists(&self.file_name).await {
            return Settings::default();
        }

        let parsed = match self.storage.read_file(&self.file_name).await {
            Ok(bytes) => serde_json::from_slice::<Option<Settings>>(&bytes).map_err(ReportError::from),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(settings) => settings.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("⚠️ Could not load settings from {}: {}", self.file_name, e);
                Settings::default()
            }
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        let normalized = Settings::new(
            settings.access_token.as_deref().unwrap_or_default(),
            &settings.property_id,
        );
        let json = serde_json::to_vec_pretty(&normalized)?;
        self.storage.write_file(&self.file_name, &json).await?;
        tracing::info!("✅ Settings saved to: {}", self.file_name);
        Ok(())
    }
}
