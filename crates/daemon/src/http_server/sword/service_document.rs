use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Extension;

use common::server::ServiceDocumentRequest;

use super::error::SwordError;
use super::{headers, xml};
use crate::http_server::Config;
use crate::ServiceState;

#[tracing::instrument(skip_all, fields(path = %uri.path()))]
pub async fn handler(
    State(state): State<ServiceState>,
    Extension(config): Extension<Config>,
    uri: Uri,
    request_headers: HeaderMap,
) -> Result<Response, SwordError> {
    let request = ServiceDocumentRequest::new(headers::request_location(
        &config,
        &request_headers,
        &uri,
    ))
    .with_credentials(headers::credentials(&request_headers)?)
    .with_on_behalf_of(headers::on_behalf_of(&request_headers)?);

    let server = state.server().clone();
    let catalogue =
        tokio::task::spawn_blocking(move || server.handle_service_document(&request)).await??;

    let body = xml::service_document(&catalogue)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, xml::SERVICE_DOCUMENT_CONTENT_TYPE)],
        body,
    )
        .into_response())
}
