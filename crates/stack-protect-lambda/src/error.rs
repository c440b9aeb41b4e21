//! Error types for the remediation handler
//!
//! API failures are classified by their AWS error code so the invoking host
//! can tell them apart. Classification never alters the code or message the
//! service returned.

use thiserror::Error;

/// Category of a failed CloudFormation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The named stack does not exist in this account/region
    StackNotFound,
    /// Request rejected by CloudFormation parameter validation
    Validation,
    /// Caller lacks `cloudformation:UpdateTerminationProtection`
    AccessDenied,
    /// Rate limit exceeded
    Throttled,
    /// Request never produced a service response (dispatch, timeout, parse)
    Transport,
    /// Any other service error code
    Service,
}

impl ApiErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StackNotFound => "StackNotFound",
            Self::Validation => "Validation",
            Self::AccessDenied => "AccessDenied",
            Self::Throttled => "Throttled",
            Self::Transport => "Transport",
            Self::Service => "Service",
        }
    }

    /// Whether a host-level retry could plausibly succeed. The handler itself
    /// never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttled | Self::Transport)
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known AWS error codes for access problems
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
    "InvalidClientTokenId",
    "ExpiredToken",
];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Classify a CloudFormation error from its code and message.
///
/// CloudFormation reports a missing stack as a `ValidationError` whose message
/// reads `Stack [name] does not exist`, so the message is inspected for that
/// one code.
pub fn classify(code: Option<&str>, message: &str) -> ApiErrorKind {
    match code {
        Some("ValidationError") if message.contains("does not exist") => {
            ApiErrorKind::StackNotFound
        }
        Some("ValidationError") => ApiErrorKind::Validation,
        Some(c) if ACCESS_DENIED_CODES.contains(&c) => ApiErrorKind::AccessDenied,
        Some(c) if THROTTLING_CODES.contains(&c) => ApiErrorKind::Throttled,
        Some(_) => ApiErrorKind::Service,
        None => ApiErrorKind::Transport,
    }
}

/// A failed `UpdateTerminationProtection` call
#[derive(Debug, Error)]
#[error("UpdateTerminationProtection failed [{kind}]: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// AWS error code as returned by the service, if a response was received
    pub code: Option<String>,
    /// Service message, verbatim
    pub message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ApiError {
    /// Build an error from the code and message, classifying it.
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: classify(code.as_deref(), &message),
            code,
            message,
            source: None,
        }
    }

    /// Attach the underlying SDK error as the source.
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Errors returned by the remediation handler
#[derive(Debug, Error)]
pub enum RemediationError {
    /// The event carries no resource identifier; no API call was made
    #[error("event is missing required field '{field}'")]
    MissingResourceId { field: String },

    /// The resource identifier is present but not a string; no API call was made
    #[error("event field '{field}' must be a string, found {found}")]
    InvalidResourceId { field: String, found: &'static str },

    /// The CloudFormation call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The call succeeded but the response did not name the stack
    #[error("UpdateTerminationProtection response for '{stack_name}' did not include a StackId")]
    MissingStackId { stack_name: String },
}

impl RemediationError {
    /// Short machine-readable label for callers that branch on the failure
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingResourceId { .. } => "MissingResourceId",
            Self::InvalidResourceId { .. } => "InvalidResourceId",
            Self::Api(err) => err.kind.as_str(),
            Self::MissingStackId { .. } => "MissingStackId",
        }
    }
}

/// Result type alias for RemediationError
pub type Result<T> = std::result::Result<T, RemediationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_classify_missing_stack() {
        assert_eq!(
            classify(Some("ValidationError"), "Stack [my-stack] does not exist"),
            ApiErrorKind::StackNotFound
        );
        assert_eq!(
            classify(Some("ValidationError"), "1 validation error detected"),
            ApiErrorKind::Validation
        );
    }

    #[test]
    fn test_classify_codes() {
        assert_eq!(
            classify(Some("AccessDenied"), "not authorized"),
            ApiErrorKind::AccessDenied
        );
        assert_eq!(
            classify(Some("Throttling"), "Rate exceeded"),
            ApiErrorKind::Throttled
        );
        assert_eq!(
            classify(Some("InternalFailure"), "boom"),
            ApiErrorKind::Service
        );
        assert_eq!(classify(None, "dispatch failure"), ApiErrorKind::Transport);
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ApiErrorKind::Throttled.is_retryable());
        assert!(ApiErrorKind::Transport.is_retryable());
        assert!(!ApiErrorKind::StackNotFound.is_retryable());
        assert!(!ApiErrorKind::AccessDenied.is_retryable());
    }

    #[test]
    fn test_api_error_keeps_message_verbatim() {
        let err = ApiError::new(
            Some("ValidationError".to_string()),
            "Stack [gone] does not exist",
        );
        assert_eq!(err.kind, ApiErrorKind::StackNotFound);
        assert_eq!(err.message, "Stack [gone] does not exist");
        assert_eq!(
            err.to_string(),
            "UpdateTerminationProtection failed [StackNotFound]: Stack [gone] does not exist"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_api_error_source_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out");
        let err = ApiError::new(None, "dispatch failure").with_source(io);
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert_eq!(err.source().unwrap().to_string(), "connect timed out");
    }

    #[test]
    fn test_remediation_error_is_transparent_over_api_error() {
        let err: RemediationError =
            ApiError::new(Some("Throttling".to_string()), "Rate exceeded").into();
        assert_eq!(err.kind(), "Throttled");
        assert_eq!(
            err.to_string(),
            "UpdateTerminationProtection failed [Throttled]: Rate exceeded"
        );
    }
}
