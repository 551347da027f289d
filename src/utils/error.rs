use crate::domain::ports::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrouperError {
    #[error("Connection error to Grouper after {attempts} attempt(s): {source}")]
    ConnectionError {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("Unexpected error from Grouper: {message}")]
    UnexpectedError { message: String },

    /// The service answered but reported a non-success result code.
    #[error("Grouper operation failed: {result_code}")]
    GroupOperationError { result_code: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl From<serde_json::Error> for GrouperError {
    fn from(err: serde_json::Error) -> Self {
        GrouperError::UnexpectedError {
            message: format!("invalid JSON: {}", err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Service,
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

impl GrouperError {
    pub fn group_operation(result_code: impl Into<String>) -> Self {
        GrouperError::GroupOperationError {
            result_code: result_code.into(),
        }
    }

    /// Failure to encode an outgoing payload, kept apart from response parsing.
    pub fn request_encoding(err: serde_json::Error) -> Self {
        GrouperError::UnexpectedError {
            message: format!("failed to encode request payload: {}", err),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        GrouperError::UnexpectedError {
            message: message.into(),
        }
    }

    /// Result code reported by the service, if this is a service failure.
    pub fn result_code(&self) -> Option<&str> {
        match self {
            GrouperError::GroupOperationError { result_code } => Some(result_code),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GrouperError::ConnectionError { .. } => ErrorCategory::Network,
            GrouperError::UnexpectedError { .. } | GrouperError::GroupOperationError { .. } => {
                ErrorCategory::Service
            }
            GrouperError::ConfigError { .. }
            | GrouperError::InvalidConfigValueError { .. }
            | GrouperError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GrouperError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Transient: the whole operation can be re-issued.
            GrouperError::ConnectionError { .. } => ErrorSeverity::Medium,
            GrouperError::GroupOperationError { .. } | GrouperError::UnexpectedError { .. } => {
                ErrorSeverity::High
            }
            GrouperError::ConfigError { .. }
            | GrouperError::InvalidConfigValueError { .. }
            | GrouperError::MissingConfigError { .. } => ErrorSeverity::High,
            GrouperError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GrouperError::ConnectionError { .. } => {
                "Check that the Grouper web service is reachable, or raise timeout/max_attempts"
            }
            GrouperError::UnexpectedError { .. } => {
                "Check the base URL and credentials; the service returned an unusable response"
            }
            GrouperError::GroupOperationError { .. } => {
                "Check the group name and subject ids; chunks sent before the failure were applied"
            }
            GrouperError::ConfigError { .. }
            | GrouperError::InvalidConfigValueError { .. }
            | GrouperError::MissingConfigError { .. } => "Fix the configuration and try again",
            GrouperError::IoError(_) => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, GrouperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_operation_error_keeps_code_verbatim() {
        let err = GrouperError::group_operation("GROUP_NOT_FOUND");
        assert_eq!(err.result_code(), Some("GROUP_NOT_FOUND"));
        assert_eq!(err.to_string(), "Grouper operation failed: GROUP_NOT_FOUND");
        assert_eq!(err.category(), ErrorCategory::Service);
    }

    #[test]
    fn test_connection_error_is_network_and_retryable() {
        let err = GrouperError::ConnectionError {
            attempts: 3,
            source: TransportError::Connect("connection refused".to_string()),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.result_code().is_none());
        assert!(err.to_string().contains("3 attempt(s)"));
    }

    #[test]
    fn test_json_error_maps_to_unexpected() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GrouperError = parse_err.into();
        assert!(matches!(err, GrouperError::UnexpectedError { .. }));
        assert!(!err.to_string().contains("response"));
    }

    #[test]
    fn test_request_encoding_error_is_labelled_as_such() {
        use serde::ser::Error as _;
        let err = GrouperError::request_encoding(serde_json::Error::custom("bad key"));
        assert!(matches!(err, GrouperError::UnexpectedError { .. }));
        assert!(err.to_string().contains("failed to encode request payload"));
    }
}
