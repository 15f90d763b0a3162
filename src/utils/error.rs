use thiserror::Error;

/// Rejections raised by the session form. These are shown to the user and
/// never abort the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("The product with code {identifier} has already been added.")]
    DuplicateIdentifier { identifier: String },

    #[error("Please fill in the required fields: {}", .fields.join(", "))]
    MissingField { fields: Vec<&'static str> },

    #[error("No products entered to generate the report.")]
    EmptyReport,

    #[error("Quantity must be at least 1 (got {value}).")]
    InvalidQuantity { value: u32 },

    #[error("Expiry date {date} is in the past.")]
    ExpiryInPast { date: String },

    #[error("Action '{action}' is not available in this form.")]
    ActionUnavailable { action: &'static str },
}

#[derive(Error, Debug)]
pub enum TrackerError {
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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    #[error(transparent)]
    FormError(#[from] FormError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Storage,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrackerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackerError::ConfigError { .. }
            | TrackerError::ConfigValidationError { .. }
            | TrackerError::InvalidConfigValueError { .. }
            | TrackerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TrackerError::CsvError(_)
            | TrackerError::SerializationError(_)
            | TrackerError::CatalogError { .. } => ErrorCategory::Data,
            TrackerError::IoError(_) => ErrorCategory::Storage,
            TrackerError::FormError(_) => ErrorCategory::Form,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Form => ErrorSeverity::Low,
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::IoError(e) => format!("Could not read or write a file: {}", e),
            TrackerError::CsvError(e) => format!("The catalog file could not be parsed: {}", e),
            TrackerError::CatalogError { message } => format!("Catalog problem: {}", message),
            TrackerError::FormError(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags and the TOML configuration file"
            }
            ErrorCategory::Data => {
                "Make sure the catalog has a header row with the identifier and description columns"
            }
            ErrorCategory::Storage => {
                "Check that the paths exist and are writable, then run the action again"
            }
            ErrorCategory::Form => "Correct the form fields and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_lists_fields() {
        let err = FormError::MissingField {
            fields: vec!["identifier", "description"],
        };
        assert_eq!(
            err.to_string(),
            "Please fill in the required fields: identifier, description"
        );
    }

    #[test]
    fn test_severity_follows_category() {
        let form: TrackerError = FormError::EmptyReport.into();
        assert_eq!(form.category(), ErrorCategory::Form);
        assert_eq!(form.severity(), ErrorSeverity::Low);

        let catalog = TrackerError::CatalogError {
            message: "missing column".to_string(),
        };
        assert_eq!(catalog.severity(), ErrorSeverity::High);

        let config = TrackerError::MissingConfigError {
            field: "catalog.path".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::Critical);
    }
}
