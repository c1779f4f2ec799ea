use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned status {status} for {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Markup error: {message}")]
    MarkupError { message: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Markup,
    Configuration,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn markup(message: impl Into<String>) -> Self {
        Self::MarkupError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::MarkupError { .. } | Self::UrlError(_) => ErrorCategory::Markup,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::Io,
            Self::CsvError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 上游暫時性問題，稍後重跑即可
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::HttpStatusError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            Self::HttpStatusError { .. } => ErrorSeverity::High,
            Self::MarkupError { .. } | Self::UrlError(_) => ErrorSeverity::High,
            Self::ProcessingError { .. } | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorSeverity::High
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "Check network connectivity and try again",
            Self::HttpStatusError { status, .. } if *status == 429 => {
                "The upstream is rate limiting; increase the pacing delay and retry later"
            }
            Self::HttpStatusError { status, .. } if *status == 404 => {
                "Check that every identifier in the roster exists"
            }
            Self::HttpStatusError { .. } => "The upstream rejected the request; retry later",
            Self::MarkupError { .. } | Self::UrlError(_) => {
                "The upstream markup may have changed; the markup adapter needs updating"
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Review the configuration file and CLI flags",
            Self::IoError(_) | Self::ZipError(_) => {
                "Check that the output path exists and is writable"
            }
            Self::CsvError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Re-run with --verbose and inspect the logs"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Failed to fetch contribution data: {}", self),
            ErrorCategory::Markup => format!("Failed to read the profile page: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Io => format!("Failed to write output: {}", self),
            ErrorCategory::Processing => format!("Failed to process data: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
