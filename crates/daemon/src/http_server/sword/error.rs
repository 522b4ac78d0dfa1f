use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use common::error::{ErrorCode, ProtocolError};
use common::receipt::{format_timestamp, Clock, SystemClock};

use super::xml::{self, XmlError};

pub const AUTHENTICATE_CHALLENGE: &str = "Basic realm=\"SWORD\"";
const ERROR_CONTENT_TYPE: &str = "application/xml";

/// Failure answering a SWORD request over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum SwordError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("failed to render response: {0}")]
    Render(#[from] XmlError),
    #[error("request handler did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl SwordError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Protocol(ProtocolError::bad_request(message))
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::AuthenticationFailure => StatusCode::UNAUTHORIZED,
        ErrorCode::MediationNotAllowed => StatusCode::FORBIDDEN,
        ErrorCode::ErrorContent | ErrorCode::ErrorBadRequest => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for SwordError {
    fn into_response(self) -> Response {
        let error = match self {
            SwordError::Protocol(error) => error,
            SwordError::Render(e) => {
                tracing::error!(error = %e, "failed to render SWORD document");
                return (StatusCode::INTERNAL_SERVER_ERROR, "failed to render response")
                    .into_response();
            }
            SwordError::Join(e) => {
                tracing::error!(error = %e, "SWORD handler task failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, "request handler failed")
                    .into_response();
            }
        };

        let status = status_for(error.code);
        tracing::debug!(code = %error.code, status = %status, message = %error.message, "SWORD error");

        let body = match xml::error_document(&error, &format_timestamp(SystemClock.now())) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "failed to render SWORD error document");
                return (status, error.message).into_response();
            }
        };

        let mut response = (status, [(header::CONTENT_TYPE, ERROR_CONTENT_TYPE)], body).into_response();
        if error.code == ErrorCode::AuthenticationFailure {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static(AUTHENTICATE_CHALLENGE),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorCode::AuthenticationFailure), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorCode::MediationNotAllowed), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorCode::ErrorContent), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::ErrorBadRequest), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auth_failure_challenges() {
        let err = SwordError::Protocol(ProtocolError::new(
            ErrorCode::AuthenticationFailure,
            "Bad credentials",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            AUTHENTICATE_CHALLENGE
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("<summary>Bad credentials</summary>"));
    }

    #[tokio::test]
    async fn test_content_error_has_no_challenge() {
        let response = SwordError::Protocol(ProtocolError::content("nope")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/xml"
        );
    }
}
