use axum::{
    debug_handler,
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::ApiUser,
    db::Db,
    models::{Message, User},
    AppError, AppResult, AppState,
};

use super::render;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MessagePatch {
    pub is_public: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Only the receiver may change a message's public and featured flags.
pub async fn edit_message(
    db: &Db,
    caller: &User,
    message_id: Uuid,
    patch: MessagePatch,
) -> AppResult<Message> {
    let Some(message) = db.get_message(message_id).await? else {
        return Err(AppError::NotFound("message"));
    };

    if message.receiver_id != caller.id {
        return Err(AppError::denied("only the receiver can change this message"));
    }

    if patch.is_public.is_none() && patch.is_featured.is_none() {
        return Ok(message);
    }

    let message = db
        .update_message_flags(message_id, patch.is_public, patch.is_featured)
        .await?
        .ok_or(AppError::NotFound("message"))?;
    info!(
        "message {} now public={} featured={}",
        message.id, message.is_public, message.is_featured
    );
    Ok(message)
}

#[debug_handler(state = AppState)]
pub(crate) async fn patch_message(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(message_id): Path<Uuid>,
    Json(patch): Json<MessagePatch>,
) -> AppResult<Html<String>> {
    let message = edit_message(&state.db, &user, message_id, patch).await?;
    let api = &state.config.api_version;

    Ok(Html(if patch.is_public.is_some() {
        render::public_button(api, message.id, message.is_public)
    } else if patch.is_featured.is_some() {
        render::fav_button(api, message.id, message.is_featured)
    } else {
        String::new()
    }))
}
