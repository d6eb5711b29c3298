use axum::routing::post;
use axum::Router;

pub mod register;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", post(register::handler))
        .with_state(state)
}
