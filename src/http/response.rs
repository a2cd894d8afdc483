//! Response construction.
//!
//! # Design Decisions
//! - Redirects are `302 Found` with an empty body
//! - `Vary: Accept-Language` so shared caches key on the header
//! - An unencodable location becomes a 500, never a panic

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Redirect to `location`.
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (
            StatusCode::FOUND,
            [
                (header::LOCATION, value),
                (header::VARY, HeaderValue::from_static("accept-language")),
            ],
        )
            .into_response(),
        Err(_) => {
            tracing::error!(location = %location, "Redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
