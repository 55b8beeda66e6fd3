use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Access token not configured")]
    MissingCredentialsError,

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Api,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ReportError::ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        ReportError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::HttpError(_) => ErrorCategory::Network,
            ReportError::ApiError { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Authentication
            }
            ReportError::ApiError { .. } => ErrorCategory::Api,
            ReportError::MissingCredentialsError => ErrorCategory::Authentication,
            ReportError::CsvError(_)
            | ReportError::SerializationError(_)
            | ReportError::ProcessingError { .. } => ErrorCategory::Data,
            ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ReportError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Api => ErrorSeverity::Medium,
            ErrorCategory::Authentication | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Transport failures, 5xx and 429 are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ReportError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ReportError::ApiError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Authentication => {
                "Check the access token and property ID in Settings, then test the connection"
            }
            ErrorCategory::Api => "The Cloudbeds API rejected the request; try again later",
            ErrorCategory::Data => "The API returned data in an unexpected shape; try reloading",
            ErrorCategory::Configuration => "Fix the configuration value and restart",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    /// Message shown to the user in the page or on the console.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::HttpError(e) => format!("Connection error: {}", e),
            ReportError::ApiError { message, .. } => message.clone(),
            ReportError::MissingCredentialsError => {
                "Please configure your access token first.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
