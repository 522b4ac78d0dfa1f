use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::catalogue::CatalogueError;

/// Error kinds a protocol operation can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Bad or mismatched credentials.
    AuthenticationFailure,
    /// On-behalf-of deposits refused, either forced by the sentinel user or
    /// by collection policy.
    MediationNotAllowed,
    /// The package could not be read or is missing required metadata.
    ErrorContent,
    /// The request itself was malformed (bad headers).
    ErrorBadRequest,
}

impl ErrorCode {
    /// SWORD error URI carried in the `href` of error documents.
    ///
    /// SWORD 1.3 defines no URI for failed credentials, so authentication
    /// failures are reported by status and summary alone.
    pub fn uri(&self) -> Option<&'static str> {
        match self {
            ErrorCode::AuthenticationFailure => None,
            ErrorCode::MediationNotAllowed => {
                Some("http://purl.org/net/sword/error/MediationNotAllowed")
            }
            ErrorCode::ErrorContent => Some("http://purl.org/net/sword/error/ErrorContent"),
            ErrorCode::ErrorBadRequest => Some("http://purl.org/net/sword/error/ErrorBadRequest"),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::AuthenticationFailure => write!(f, "AuthenticationFailure"),
            ErrorCode::MediationNotAllowed => write!(f, "MediationNotAllowed"),
            ErrorCode::ErrorContent => write!(f, "ErrorContent"),
            ErrorCode::ErrorBadRequest => write!(f, "ErrorBadRequest"),
        }
    }
}

/// A failed protocol operation: a machine-readable code and a message for
/// the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ProtocolError {
    pub code: ErrorCode,
    pub message: String,
}

impl ProtocolError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn content(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ErrorContent, message)
    }

    pub fn mediation_not_allowed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MediationNotAllowed, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ErrorBadRequest, message)
    }
}

impl From<AuthError> for ProtocolError {
    fn from(e: AuthError) -> Self {
        Self::new(ErrorCode::AuthenticationFailure, e.to_string())
    }
}

impl From<CatalogueError> for ProtocolError {
    fn from(e: CatalogueError) -> Self {
        match e {
            CatalogueError::MediationNotAllowed => Self::mediation_not_allowed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failure_has_no_error_uri() {
        assert_eq!(ErrorCode::AuthenticationFailure.uri(), None);
        let err = ProtocolError::from(AuthError::BadCredentials);
        assert_eq!(err.code.uri(), None);
    }

    #[test]
    fn test_error_uris_match_their_codes() {
        for code in [
            ErrorCode::MediationNotAllowed,
            ErrorCode::ErrorContent,
            ErrorCode::ErrorBadRequest,
        ] {
            let uri = code.uri().unwrap();
            assert!(uri.starts_with("http://purl.org/net/sword/error/"));
            assert!(uri.ends_with(&code.to_string()));
        }
    }
}
