use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

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

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Movie not found: {title}")]
    NotFound { title: String },

    #[error("Movie already exists: {title}")]
    Duplicate { title: String },

    #[error("No metadata found for: {title}")]
    LookupNotFound { title: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Storage,
    Network,
    Configuration,
    Unexpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::ValidationError {
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        CatalogError::Unexpected {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::ValidationError { .. }
            | CatalogError::InvalidPattern(_)
            | CatalogError::Duplicate { .. } => ErrorCategory::Validation,
            CatalogError::NotFound { .. } | CatalogError::LookupNotFound { .. } => {
                ErrorCategory::NotFound
            }
            CatalogError::IoError(_)
            | CatalogError::CsvError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::TemplateError { .. } => ErrorCategory::Storage,
            CatalogError::ApiError(_) => ErrorCategory::Network,
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CatalogError::Unexpected { .. } => ErrorCategory::Unexpected,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Unexpected => ErrorSeverity::Critical,
        }
    }

    /// Message shown on the console; never includes internal detail for
    /// unexpected faults.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CatalogError::NotFound { title } => format!("{} not in DB", title),
            CatalogError::Duplicate { title } => format!("Movie '{}' exists in db", title),
            CatalogError::LookupNotFound { title } => {
                format!("Title missing or incorrect: '{}'", title)
            }
            CatalogError::InvalidPattern(e) => format!("Invalid regular expression: {}", e),
            CatalogError::ValidationError { message } => message.clone(),
            CatalogError::ApiError(_) => "Could not reach the movie database service".to_string(),
            CatalogError::IoError(_)
            | CatalogError::CsvError(_)
            | CatalogError::SerializationError(_) => {
                "Error occurred while saving the movie database. Please try again.".to_string()
            }
            CatalogError::TemplateError { message } => {
                format!("Web page could not be generated: {}", message)
            }
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. } => format!("{}", self),
            CatalogError::Unexpected { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check the value you entered and try again",
            ErrorCategory::NotFound => "List the movies to check the exact title",
            ErrorCategory::Storage => "Check that the database file is writable and not corrupted",
            ErrorCategory::Network => "Check your network connection and API key",
            ErrorCategory::Configuration => "Check the command line flags and the config file",
            ErrorCategory::Unexpected => "See logs/app.log for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
