//! Cloud provisioning error types

use thiserror::Error;

/// Cloud provisioning errors
#[derive(Error, Debug)]
pub enum CloudError {
    /// Caller-supplied configuration rejected before any remote call.
    /// The message is displayed verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// A remote call succeeded but did not carry the identifier we needed.
    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("{operation} failed: {message}")]
    Remote {
        operation: String,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl CloudError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        CloudError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn remote(
        operation: impl Into<String>,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        CloudError::Remote {
            operation: operation.into(),
            code,
            message: message.into(),
        }
    }

    pub fn empty(what: impl Into<String>) -> Self {
        CloudError::EmptyResult(what.into())
    }

    /// Whether this error means "the looked-up resource does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, CloudError::AlreadyExists(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CloudError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = CloudError::Validation("Bad value.  [Value: x]".to_string());
        assert_eq!(err.to_string(), "Bad value.  [Value: x]");
        assert!(err.is_validation());
    }

    #[test]
    fn test_not_found_display() {
        let err = CloudError::not_found("Target group", "web-tg");
        assert_eq!(err.to_string(), "Target group not found: web-tg");
        assert!(err.is_not_found());
        assert!(!CloudError::empty("VpcId").is_not_found());
    }
}
