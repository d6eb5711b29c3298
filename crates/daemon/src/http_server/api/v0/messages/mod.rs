use axum::routing::{get, post};
use axum::Router;

pub mod delete;
pub mod get;
pub mod inbox;
pub mod send;
pub mod update;

pub use delete::{DeleteMessageRequest, DeleteMessageResponse};
pub use get::{GetMessageRequest, GetMessageResponse};
pub use inbox::{InboxRequest, InboxResponse};
pub use send::{SendRequest, SendResponse};
pub use update::{UpdateMessageBody, UpdateMessageRequest, UpdateMessageResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", post(send::handler))
        .route("/inbox", get(inbox::handler))
        .route(
            "/:message_id",
            get(get::handler)
                .put(update::handler)
                .delete(delete::handler),
        )
        .with_state(state)
}
