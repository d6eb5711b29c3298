use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use common::prelude::MessageServiceError;

/// JSON body of every API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn response(status: StatusCode, message: impl Into<String>) -> Response {
        (
            status,
            Json(ErrorBody {
                error: message.into(),
            }),
        )
            .into_response()
    }
}

/// Status and client-safe message for a service failure. Internal failures
///  are reduced to a generic message; the detail was logged where it
///  happened
pub fn service_error_response(err: &MessageServiceError) -> Response {
    let status = match err {
        MessageServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        MessageServiceError::Forbidden => StatusCode::FORBIDDEN,
        MessageServiceError::RecipientKeyMissing(_) | MessageServiceError::MessageNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        MessageServiceError::DuplicateKey(_) => StatusCode::CONFLICT,
        MessageServiceError::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        MessageServiceError::KeyMissing(_)
        | MessageServiceError::Crypto
        | MessageServiceError::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "internal server error".to_string()
    } else {
        err.to_string()
    };

    ErrorBody::response(status, message)
}
