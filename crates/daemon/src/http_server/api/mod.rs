use axum::Router;

pub mod client;
mod error;
pub mod v0;

pub use error::{service_error_response, ErrorBody};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/v0", v0::router(state.clone()))
        .with_state(state)
}
