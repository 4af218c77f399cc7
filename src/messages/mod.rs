mod edit;
mod inbox;
mod submit;

pub mod render;

use axum::{routing::{get, patch, post}, Router};

use crate::AppState;

pub use edit::{edit_message, MessagePatch};
pub use inbox::{favorites, open_received, sent, ReceivedInbox};
pub use submit::{submit_message, MessageForm};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(inbox::messages_page))
        .route("/users/{user_id}/messages", post(submit::create_message_for_user))
        .route("/success", get(submit::message_sent))
}

/// Fragment endpoints, mounted under the api prefix.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(inbox::received_messages))
        .route("/messages/sent", get(inbox::sent_messages))
        .route("/messages/fav", get(inbox::fav_messages))
        .route("/messages/{message_id}", patch(edit::patch_message))
}
