use thiserror::Error;

/// Result type alias using OpError
pub type Result<T> = std::result::Result<T, OpError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling and testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpErrorKind {
    /// A call-site argument cannot be used (an empty result label)
    InvalidArgument,
    /// A configuration value or document could not be interpreted
    InvalidConfig,
}

impl OpErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            OpErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            OpErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
        }
    }
}

/// Errors raised by the operation timing core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpError {
    /// An argument passed at the call site was rejected
    #[error("Invalid argument '{param}': {reason}")]
    InvalidArgument { param: &'static str, reason: String },

    /// A level name did not match any known severity
    #[error("Unknown log level: {value}")]
    UnknownLevel { value: String },

    /// A configuration document could not be deserialised
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl OpError {
    pub(crate) fn invalid_argument(param: &'static str, reason: impl Into<String>) -> Self {
        OpError::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> OpErrorKind {
        match self {
            OpError::InvalidArgument { .. } => OpErrorKind::InvalidArgument,
            OpError::UnknownLevel { .. } | OpError::Config { .. } => OpErrorKind::InvalidConfig,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

impl From<toml::de::Error> for OpError {
    fn from(err: toml::de::Error) -> Self {
        OpError::Config {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = OpError::invalid_argument("result_label", "result label must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'result_label': result label must not be empty"
        );
        assert_eq!(err.code(), "ERR_INVALID_ARGUMENT");
    }

    #[test]
    fn test_config_errors_share_kind() {
        let unknown = OpError::UnknownLevel {
            value: "loud".to_string(),
        };
        let config = OpError::Config {
            reason: "bad".to_string(),
        };
        assert_eq!(unknown.kind(), OpErrorKind::InvalidConfig);
        assert_eq!(config.kind(), unknown.kind());
    }
}
