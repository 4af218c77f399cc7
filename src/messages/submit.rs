use axum::{
    debug_handler,
    extract::{rejection::FormRejection, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::Visitor,
    db::Db,
    include_res,
    models::{Message, NewMessage, User},
    res, AppError, AppResult, AppState,
};

#[derive(Debug, Clone, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub anonymously: bool,
}

/// Leaves a message on `receiver_id`'s profile, honouring their privacy
/// flags. The sender is recorded whenever there is a session, even for
/// anonymous messages.
pub async fn submit_message(
    db: &Db,
    sender: Option<&User>,
    receiver_id: Uuid,
    form: MessageForm,
) -> AppResult<Message> {
    let Some(receiver) = db.get_user(receiver_id).await? else {
        return Err(AppError::NotFound("user"));
    };

    let content = form.content.trim();
    if content.is_empty() {
        return Err(AppError::validation("message is empty"));
    }
    if !receiver.privacy.allow_new_messages {
        return Err(AppError::denied(format!("{} is not accepting new messages", receiver.name)));
    }
    if form.anonymously && !receiver.privacy.allow_anonymous_users_messages {
        return Err(AppError::denied(format!(
            "{} is not accepting anonymous messages",
            receiver.name
        )));
    }

    let message = db
        .create_message(&NewMessage {
            content: content.to_string(),
            sender_id: sender.map(|u| u.id),
            receiver_id: receiver.id,
            is_anonymous: form.anonymously,
        })
        .await?;
    info!("message {} left for {}", message.id, receiver.id);
    Ok(message)
}

fn not_sent(user_id: Uuid, e: &AppError) -> Response {
    let body = include_res!(str, "/pages/not_sent.html")
        .replace("{alert}", &res::alert("danger", &e.user_message()))
        .replace("{profile}", &format!("/users/{user_id}"));
    (e.status(), Html(res::layout("Message not sent", &body))).into_response()
}

#[debug_handler(state = AppState)]
pub(crate) async fn create_message_for_user(
    State(db): State<Db>,
    Path(user_id): Path<Uuid>,
    Visitor(visitor): Visitor,
    form: Result<Form<MessageForm>, FormRejection>,
) -> AppResult<Response> {
    let result = match form {
        Ok(Form(form)) => submit_message(&db, visitor.as_ref(), user_id, form).await,
        Err(rejection) => {
            debug!("malformed message form: {rejection}");
            Err(AppError::validation("the message form could not be read"))
        }
    };

    match result {
        Ok(_) => Ok(Redirect::to("/success").into_response()),
        Err(e @ (AppError::Validation(_) | AppError::PermissionDenied(_))) => {
            warn!("message for {user_id} refused: {e}");
            Ok(not_sent(user_id, &e))
        }
        Err(e) => Err(e),
    }
}

#[debug_handler]
pub(crate) async fn message_sent() -> Html<String> {
    Html(res::layout("Message sent", include_res!(str, "/pages/success.html")))
}
