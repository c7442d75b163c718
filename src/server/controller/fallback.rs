use axum::{http::StatusCode, response::IntoResponse};

use crate::server::error::NOT_FOUND_BODY;

/// Terminal stage for requests no earlier stage claimed, for every HTTP method.
///
/// # Returns
/// - `404 Not Found` with the fixed plain-text body
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}
