//! Request inspection.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Extract the language preference header as text

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID for log correlation, "unknown" if missing.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// All `Accept-Language` values joined with ", ".
///
/// Bytes that are not valid UTF-8 become U+FFFD; the parser skips them like
/// any other unrecognized text. Returns `None` when the header is absent.
pub fn accept_language(headers: &HeaderMap) -> Option<String> {
    let values: Vec<String> = headers
        .get_all(header::ACCEPT_LANGUAGE)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_header() {
        assert_eq!(accept_language(&HeaderMap::new()), None);
    }

    #[test]
    fn test_repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append(header::ACCEPT_LANGUAGE, HeaderValue::from_static("de;q=0.5"));
        headers.append(header::ACCEPT_LANGUAGE, HeaderValue::from_static("fr"));
        assert_eq!(accept_language(&headers).as_deref(), Some("de;q=0.5, fr"));
    }

    #[test]
    fn test_opaque_bytes_are_decoded_lossily() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_bytes(b"fr-\xe9").unwrap(),
        );
        assert_eq!(accept_language(&headers).as_deref(), Some("fr-\u{fffd}"));

        headers.append(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en;q=0.1"));
        assert_eq!(
            accept_language(&headers).as_deref(),
            Some("fr-\u{fffd}, en;q=0.1")
        );
    }

    #[test]
    fn test_request_id_generation() {
        let req = Request::builder().body(()).unwrap();
        let id = UuidRequestId.make_request_id(&req).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
