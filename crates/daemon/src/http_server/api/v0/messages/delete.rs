//! Delete a message the caller sent or received

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{MessageId, MessageServiceError, UserId};

use crate::http_server::api::client::{with_caller, ApiError, ApiRequest};
use crate::http_server::api::service_error_response;
use crate::http_server::CallerId;
use crate::ServiceState;

#[derive(Debug, Clone)]
pub struct DeleteMessageRequest {
    pub message_id: MessageId,
    pub caller: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMessageResponse {
    pub message_id: MessageId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    CallerId(caller): CallerId,
    Path(message_id): Path<MessageId>,
) -> Result<impl IntoResponse, DeleteMessageError> {
    state.messages().delete(caller, message_id).await?;

    Ok((
        http::StatusCode::OK,
        Json(DeleteMessageResponse { message_id }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteMessageError {
    #[error(transparent)]
    Service(#[from] MessageServiceError),
}

impl IntoResponse for DeleteMessageError {
    fn into_response(self) -> Response {
        match self {
            DeleteMessageError::Service(e) => service_error_response(&e),
        }
    }
}

impl ApiRequest for DeleteMessageRequest {
    type Response = DeleteMessageResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/api/v0/messages/{}", self.message_id))?;
        Ok(with_caller(client.delete(full_url), self.caller))
    }
}
