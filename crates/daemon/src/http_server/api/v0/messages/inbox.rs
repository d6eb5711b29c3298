//! Read the caller's inbox

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{DecryptedMessage, InboxFailure, MessageServiceError, UserId};

use crate::http_server::api::client::{with_caller, ApiError, ApiRequest};
use crate::http_server::api::service_error_response;
use crate::http_server::CallerId;
use crate::ServiceState;

#[derive(Debug, Clone)]
pub struct InboxRequest {
    pub caller: Option<UserId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InboxResponse {
    pub messages: Vec<DecryptedMessage>,
    /// One entry per record that could not be opened
    pub failed: Vec<InboxFailure>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    CallerId(caller): CallerId,
) -> Result<impl IntoResponse, InboxError> {
    let inbox = state.messages().read_inbox(caller).await?;

    Ok((
        http::StatusCode::OK,
        Json(InboxResponse {
            failed: inbox.failures,
            messages: inbox.messages,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum InboxError {
    #[error(transparent)]
    Service(#[from] MessageServiceError),
}

impl IntoResponse for InboxError {
    fn into_response(self) -> Response {
        match self {
            InboxError::Service(e) => service_error_response(&e),
        }
    }
}

impl ApiRequest for InboxRequest {
    type Response = InboxResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/messages/inbox")?;
        Ok(with_caller(client.get(full_url), self.caller))
    }
}
