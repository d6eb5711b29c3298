#[allow(clippy::module_inception)]
mod client;
mod error;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use common::prelude::UserId;

pub use client::ApiClient;
pub use error::ApiError;

use crate::http_server::CALLER_HEADER;

/// A typed request against the API, paired with its response type
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// Attach the caller identity header when acting as a user
pub(crate) fn with_caller(builder: RequestBuilder, caller: Option<UserId>) -> RequestBuilder {
    match caller {
        Some(user_id) => builder.header(CALLER_HEADER, user_id.to_string()),
        None => builder,
    }
}
