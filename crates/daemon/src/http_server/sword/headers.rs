//! Decoding of the request headers a SWORD client sends.

use axum::http::{header, HeaderMap, HeaderName, Uri};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use common::auth::Credentials;

use super::error::SwordError;
use crate::http_server::Config;

pub const ON_BEHALF_OF: HeaderName = HeaderName::from_static("x-on-behalf-of");
pub const SLUG: HeaderName = HeaderName::from_static("slug");
pub const PACKAGING: HeaderName = HeaderName::from_static("x-packaging");
pub const FORMAT_NAMESPACE: HeaderName = HeaderName::from_static("x-format-namespace");
pub const NO_OP: HeaderName = HeaderName::from_static("x-no-op");
pub const VERBOSE: HeaderName = HeaderName::from_static("x-verbose");

/// Host used when the request names none and no public URL is configured.
const FALLBACK_HOST: &str = "localhost";

fn text(headers: &HeaderMap, name: &HeaderName) -> Result<Option<String>, SwordError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(|s| s.trim().to_string())
                .map_err(|_| SwordError::bad_request(format!("{} header is not valid text", name)))
        })
        .transpose()
}

/// `true`/`false` in any case; absent means false.
pub fn flag(headers: &HeaderMap, name: &HeaderName) -> Result<bool, SwordError> {
    match text(headers, name)? {
        None => Ok(false),
        Some(value) if value.eq_ignore_ascii_case("true") => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("false") => Ok(false),
        Some(value) => Err(SwordError::bad_request(format!(
            "{} header must be true or false, got '{}'",
            name, value
        ))),
    }
}

/// Credentials from an HTTP Basic `Authorization` header. Requests without
/// the header, or using another scheme, are anonymous.
pub fn credentials(headers: &HeaderMap) -> Result<Credentials, SwordError> {
    let Some(value) = text(headers, &header::AUTHORIZATION)? else {
        return Ok(Credentials::anonymous());
    };

    let Some((scheme, encoded)) = value.split_once(' ') else {
        return Ok(Credentials::anonymous());
    };
    if !scheme.eq_ignore_ascii_case("basic") {
        tracing::debug!(scheme = %scheme, "ignoring non-basic authorization");
        return Ok(Credentials::anonymous());
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| SwordError::bad_request("Authorization header is not valid base64"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| SwordError::bad_request("Authorization header is not valid UTF-8"))?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| SwordError::bad_request("Authorization header is missing a password"))?;

    Ok(Credentials::new(username, password))
}

pub fn on_behalf_of(headers: &HeaderMap) -> Result<Option<String>, SwordError> {
    text(headers, &ON_BEHALF_OF)
}

pub fn slug(headers: &HeaderMap) -> Result<Option<String>, SwordError> {
    text(headers, &SLUG)
}

pub fn content_type(headers: &HeaderMap) -> Result<Option<String>, SwordError> {
    text(headers, &header::CONTENT_TYPE)
}

/// `X-Packaging`, or the older `X-Format-Namespace`.
pub fn packaging(headers: &HeaderMap) -> Result<Option<String>, SwordError> {
    match text(headers, &PACKAGING)? {
        Some(packaging) => Ok(Some(packaging)),
        None => text(headers, &FORMAT_NAMESPACE),
    }
}

/// The `filename` parameter of `Content-Disposition`.
pub fn filename(headers: &HeaderMap) -> Result<Option<String>, SwordError> {
    let Some(disposition) = text(headers, &header::CONTENT_DISPOSITION)? else {
        return Ok(None);
    };

    Ok(disposition.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| value.trim().trim_matches('"').to_string())
    }))
}

/// Absolute URL the request was made at: the configured public URL (or
/// `http://<Host>`) followed by the path and query.
pub fn request_location(config: &Config, headers: &HeaderMap, uri: &Uri) -> String {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    if let Some(base) = config.public_base() {
        return format!("{}{}", base, path);
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_else(|| FALLBACK_HOST.to_string());

    format!("http://{}{}", host, path)
}
