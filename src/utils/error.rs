use thiserror::Error;

/// Classification produced when an input vector fails validation.
///
/// This is the only failure the calculation core can report; once inputs are
/// valid every formula has an explicit fallback.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid input for '{field}' ({value:?}): {reason}")]
pub struct InvalidInput {
    pub field: String,
    pub value: String,
    pub reason: String,
}

impl InvalidInput {
    pub fn new(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AffordError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigError { field: String, message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AffordError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput(_) => ErrorCategory::Input,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorCategory::Storage
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidInput(_) => ErrorSeverity::Medium,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::CsvError(_) | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput(e) => format!("Input '{}' is not usable: {}", e.field, e.reason),
            Self::ConfigError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::CsvError(e) => format!("CSV file could not be processed: {}", e),
            Self::SerializationError(e) => format!("Output could not be serialized: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Provide a positive price, rate and term, and non-negative rent, income and debt"
            }
            ErrorCategory::Configuration => "Check the TOML configuration file against the documented sections",
            ErrorCategory::Storage => "Check that the file exists and that its directory is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, AffordError>;
