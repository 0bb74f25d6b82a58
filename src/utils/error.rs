use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinderError {
    #[error("Provisioning failed for topic '{topic}' (group '{group}'): {message}")]
    ProvisioningError {
        topic: String,
        group: String,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Provisioning,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BinderError {
    pub fn provisioning(topic: &str, group: &str, message: impl Into<String>) -> Self {
        Self::ProvisioningError {
            topic: topic.to_string(),
            group: group.to_string(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProvisioningError { .. } => ErrorCategory::Provisioning,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Provisioning => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ProvisioningError { .. } => {
                "Check that the broker is reachable, the topic exists or auto-creation is enabled, and the principal may create topics"
            }
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the binder configuration file"
            }
            Self::InvalidConfigValueError { .. } => {
                "Topic names may only contain letters, digits, '.', '_' and '-'"
            }
            Self::MissingConfigError { .. } => "Add the missing field to the configuration",
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "The topic catalog file may be corrupted; inspect or remove it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ProvisioningError { topic, message, .. } => {
                format!("無法準備主題 '{}': {}", topic, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("配置欄位 '{}' 無效: {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("缺少必要配置: {}", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioning_error_is_high_severity() {
        let err = BinderError::provisioning("orders", "g1", "broker unreachable");
        assert_eq!(err.category(), ErrorCategory::Provisioning);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("'orders'"));
        assert!(err.to_string().contains("'g1'"));
    }

    #[test]
    fn test_severity_ordering() {
        let io = BinderError::IoError(std::io::Error::other("disk full"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
        assert!(ErrorSeverity::High < ErrorSeverity::Critical);
    }

    #[test]
    fn test_config_errors_share_category() {
        let errors = [
            BinderError::config("no bindings"),
            BinderError::MissingConfigError {
                field: "bindings".to_string(),
            },
            BinderError::InvalidConfigValueError {
                field: "bindings[0].destination".to_string(),
                value: "bad topic".to_string(),
                reason: "illegal character".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(err.category(), ErrorCategory::Configuration);
            assert_eq!(err.severity(), ErrorSeverity::Medium);
        }
    }
}
