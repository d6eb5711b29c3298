use axum::Router;

pub mod messages;
pub mod users;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/users", users::router(state.clone()))
        .nest("/messages", messages::router(state.clone()))
        .with_state(state)
}
