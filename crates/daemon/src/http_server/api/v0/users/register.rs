//! Register a new user and issue its key

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{MessageServiceError, UserId};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::service_error_response;
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

pub async fn handler(State(state): State<ServiceState>) -> Result<impl IntoResponse, RegisterError> {
    let user_id = state.messages().register().await?;

    Ok((
        http::StatusCode::CREATED,
        Json(RegisterResponse { user_id }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error(transparent)]
    Service(#[from] MessageServiceError),
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        match self {
            RegisterError::Service(e) => service_error_response(&e),
        }
    }
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/users")?;
        Ok(client.post(full_url).json(&self))
    }
}
