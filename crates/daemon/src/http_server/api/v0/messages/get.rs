//! Metadata of a single message

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{MessageId, MessageServiceError, MessageSummary, UserId};

use crate::http_server::api::client::{with_caller, ApiError, ApiRequest};
use crate::http_server::api::service_error_response;
use crate::http_server::CallerId;
use crate::ServiceState;

#[derive(Debug, Clone)]
pub struct GetMessageRequest {
    pub message_id: MessageId,
    pub caller: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMessageResponse {
    pub message: MessageSummary,
}

pub async fn handler(
    State(state): State<ServiceState>,
    CallerId(caller): CallerId,
    Path(message_id): Path<MessageId>,
) -> Result<impl IntoResponse, GetMessageError> {
    let message = state.messages().message_info(caller, message_id).await?;

    Ok((http::StatusCode::OK, Json(GetMessageResponse { message })))
}

#[derive(Debug, thiserror::Error)]
pub enum GetMessageError {
    #[error(transparent)]
    Service(#[from] MessageServiceError),
}

impl IntoResponse for GetMessageError {
    fn into_response(self) -> Response {
        match self {
            GetMessageError::Service(e) => service_error_response(&e),
        }
    }
}

impl ApiRequest for GetMessageRequest {
    type Response = GetMessageResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/api/v0/messages/{}", self.message_id))?;
        Ok(with_caller(client.get(full_url), self.caller))
    }
}
