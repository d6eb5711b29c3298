//! Send a message, sealed for its recipient

use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{MessageId, MessageServiceError, UserId};

use crate::http_server::api::client::{with_caller, ApiError, ApiRequest};
use crate::http_server::api::{service_error_response, ErrorBody};
use crate::http_server::MaybeCallerId;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    /// Parsed by the handler so malformed ids are reported like any
    ///  other invalid input
    #[serde(default)]
    pub recipient_id: String,
    #[serde(default)]
    pub content: String,
    /// Sender identity, sent as the caller header. Absent for anonymous
    ///  sends
    #[serde(skip)]
    pub sender: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub message_id: MessageId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    MaybeCallerId(sender): MaybeCallerId,
    Json(req): Json<SendRequest>,
) -> Result<impl IntoResponse, SendError> {
    let recipient_id: UserId = req
        .recipient_id
        .parse()
        .map_err(|_| SendError::InvalidRecipient)?;

    let message_id = state
        .messages()
        .send(sender, recipient_id, &req.content)
        .await?;

    Ok((
        http::StatusCode::CREATED,
        Json(SendResponse { message_id }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("recipient_id must be a valid user id")]
    InvalidRecipient,
    #[error(transparent)]
    Service(#[from] MessageServiceError),
}

impl IntoResponse for SendError {
    fn into_response(self) -> Response {
        match self {
            SendError::InvalidRecipient => {
                ErrorBody::response(http::StatusCode::BAD_REQUEST, self.to_string())
            }
            SendError::Service(e) => service_error_response(&e),
        }
    }
}

impl ApiRequest for SendRequest {
    type Response = SendResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/messages")?;
        let sender = self.sender;
        Ok(with_caller(client.post(full_url).json(&self), sender))
    }
}
