use std::io::Cursor;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Extension;

use common::server::DepositRequest;

use super::error::SwordError;
use super::{headers, xml};
use crate::http_server::Config;
use crate::ServiceState;

fn decode_request(
    config: &Config,
    uri: &Uri,
    request_headers: &HeaderMap,
    body: Bytes,
) -> Result<DepositRequest, SwordError> {
    let location = headers::request_location(config, request_headers, uri);

    Ok(DepositRequest::new(location, Cursor::new(body))
        .with_credentials(headers::credentials(request_headers)?)
        .with_on_behalf_of(headers::on_behalf_of(request_headers)?)
        .with_filename(headers::filename(request_headers)?)
        .with_slug(headers::slug(request_headers)?)
        .with_content_type(headers::content_type(request_headers)?)
        .with_packaging(headers::packaging(request_headers)?)
        .with_no_op(headers::flag(request_headers, &headers::NO_OP)?)
        .with_verbose(headers::flag(request_headers, &headers::VERBOSE)?))
}

#[tracing::instrument(skip_all, fields(path = %uri.path(), size = body.len()))]
pub async fn handler(
    State(state): State<ServiceState>,
    Extension(config): Extension<Config>,
    uri: Uri,
    request_headers: HeaderMap,
    body: Bytes,
) -> Result<Response, SwordError> {
    let request = decode_request(&config, &uri, &request_headers, body)?;

    // Package validation is blocking zip and xml work.
    let server = state.server().clone();
    let ack = tokio::task::spawn_blocking(move || server.handle_deposit(request)).await??;

    let body = xml::entry_document(&ack)?;
    let status = StatusCode::from_u16(ack.status.http_status()).unwrap_or(StatusCode::CREATED);

    Ok((
        status,
        [
            (header::CONTENT_TYPE, xml::ENTRY_CONTENT_TYPE.to_string()),
            (header::LOCATION, ack.location.clone()),
        ],
        body,
    )
        .into_response())
}
