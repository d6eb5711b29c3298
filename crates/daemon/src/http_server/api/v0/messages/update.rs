//! Replace the content of a message the caller sent

use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{MessageId, MessageServiceError, UserId};

use crate::http_server::api::client::{with_caller, ApiError, ApiRequest};
use crate::http_server::api::service_error_response;
use crate::http_server::CallerId;
use crate::ServiceState;

#[derive(Debug, Clone)]
pub struct UpdateMessageRequest {
    pub message_id: MessageId,
    pub content: String,
    pub caller: Option<UserId>,
}

/// Body of the PUT request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessageBody {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessageResponse {
    pub message_id: MessageId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    CallerId(caller): CallerId,
    Path(message_id): Path<MessageId>,
    Json(body): Json<UpdateMessageBody>,
) -> Result<impl IntoResponse, UpdateMessageError> {
    state
        .messages()
        .update_content(caller, message_id, &body.content)
        .await?;

    Ok((
        http::StatusCode::OK,
        Json(UpdateMessageResponse { message_id }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateMessageError {
    #[error(transparent)]
    Service(#[from] MessageServiceError),
}

impl IntoResponse for UpdateMessageError {
    fn into_response(self) -> Response {
        match self {
            UpdateMessageError::Service(e) => service_error_response(&e),
        }
    }
}

impl ApiRequest for UpdateMessageRequest {
    type Response = UpdateMessageResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/api/v0/messages/{}", self.message_id))?;
        let body = UpdateMessageBody {
            content: self.content,
        };
        Ok(with_caller(client.put(full_url).json(&body), self.caller))
    }
}
