use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::http_server::api::ErrorBody;

/// Fallback for unmatched routes. API clients asking for JSON get an
///  [`ErrorBody`], everyone else plain text.
pub async fn not_found_handler(uri: Uri, headers: HeaderMap) -> Response {
    tracing::debug!(path = %uri.path(), "no route matched");

    let wants_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"));

    if wants_json || uri.path().starts_with("/api/") {
        return ErrorBody::response(StatusCode::NOT_FOUND, "not found");
    }

    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "not found",
    )
        .into_response()
}
