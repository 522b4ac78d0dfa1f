use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use super::error::SwordError;
use super::headers;
use crate::ServiceState;

/// Content negotiation on a deposited item. Nothing is stored, so a
/// successful check answers with an empty body.
#[tracing::instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    request_headers: HeaderMap,
) -> Result<Response, SwordError> {
    let credentials = headers::credentials(&request_headers)?;
    state.server().handle_document_negotiation(&credentials)?;
    Ok(StatusCode::OK.into_response())
}
