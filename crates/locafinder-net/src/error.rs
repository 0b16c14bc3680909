//! Failures of the remote collaborators.
//!
//! The variants fall in two groups, which the domain layer reports
//! differently:
//!
//! - the call did not complete or was refused: [`NetworkError::Unreachable`],
//!   [`NetworkError::Timeout`], [`NetworkError::HttpStatus`] and the
//!   local [`NetworkError::InvalidUrl`] / [`NetworkError::Encode`];
//! - the service answered but the payload is unusable:
//!   [`NetworkError::Json`], [`NetworkError::InvalidBody`] and
//!   [`NetworkError::UnexpectedShape`].

use std::fmt;

/// Error raised by an HTTP call or by decoding its reply.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection, DNS, TLS or redirect failure.
    Unreachable(String),
    /// The call exceeded its timeout.
    Timeout,
    /// The configured endpoint is not a valid URL.
    InvalidUrl(String),
    /// The request body could not be encoded as JSON.
    Encode(String),
    /// The service answered with a non-2xx status.
    HttpStatus {
        status: u16,
        /// Start of the error body, when there was one.
        message: Option<String>,
    },
    /// The reply is not valid JSON or does not match the expected type.
    Json(String),
    /// The reply body could not be read.
    InvalidBody(String),
    /// The reply decoded but lacks the fields the contract promises.
    UnexpectedShape(String),
}

impl NetworkError {
    /// Whether the service answered but its payload could not be used.
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            Self::Json(_) | Self::InvalidBody(_) | Self::UnexpectedShape(_)
        )
    }

    /// Whether trying the same call again later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Timeout => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::UnexpectedShape(message.into())
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(detail) => write!(f, "service unreachable: {detail}"),
            Self::Timeout => f.write_str("call timed out"),
            Self::InvalidUrl(detail) => write!(f, "invalid endpoint URL: {detail}"),
            Self::Encode(detail) => write!(f, "could not encode request body: {detail}"),
            Self::HttpStatus {
                status,
                message: Some(message),
            } => write!(f, "service answered {status}: {message}"),
            Self::HttpStatus {
                status,
                message: None,
            } => write!(f, "service answered {status}"),
            Self::Json(detail) => write!(f, "reply is not the expected JSON: {detail}"),
            Self::InvalidBody(detail) => write!(f, "reply body unreadable: {detail}"),
            Self::UnexpectedShape(detail) => write!(f, "unexpected reply shape: {detail}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() || err.is_body() {
            Self::InvalidBody(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                status: status.as_u16(),
                message: None,
            }
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result of a network operation.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_classification() {
        assert!(NetworkError::Json("eof".into()).is_malformed_response());
        assert!(NetworkError::unexpected_shape("no output").is_malformed_response());
        assert!(!NetworkError::Timeout.is_malformed_response());
        assert!(!NetworkError::Encode("key must be a string".into()).is_malformed_response());
        assert!(
            !NetworkError::HttpStatus {
                status: 502,
                message: None
            }
            .is_malformed_response()
        );
    }

    #[test]
    fn test_transient_statuses() {
        let status = |status| NetworkError::HttpStatus {
            status,
            message: None,
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
        assert!(NetworkError::Timeout.is_transient());
        assert!(!NetworkError::Json("eof".into()).is_transient());
    }

    #[test]
    fn test_display() {
        let err = NetworkError::HttpStatus {
            status: 404,
            message: Some("missing".into()),
        };
        assert_eq!(err.to_string(), "service answered 404: missing");
        assert_eq!(NetworkError::Timeout.to_string(), "call timed out");
    }
}
