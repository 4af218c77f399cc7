use axum::{
    debug_handler,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::{
    auth::Visitor,
    db::{Db, Page},
    include_res,
    messages::render,
    models::{InboxEntry, User},
    res, AppError, AppResult, AppState,
};

#[derive(Debug)]
pub enum ProfileVisit {
    /// The visitor opened their own profile; nothing is counted.
    Own,
    Visited {
        user: User,
        messages: Vec<InboxEntry>,
    },
}

/// Every view by someone else counts as one visit.
pub async fn visit_profile(
    db: &Db,
    visitor: Option<&User>,
    user_id: Uuid,
    page: Page,
) -> AppResult<ProfileVisit> {
    if visitor.is_some_and(|v| v.id == user_id) {
        return Ok(ProfileVisit::Own);
    }

    let Some(user) = db.increase_user_visitors(user_id).await? else {
        return Err(AppError::NotFound("user"));
    };
    let messages = db
        .public_messages(user_id, page)
        .await?
        .into_iter()
        .map(InboxEntry::from)
        .collect();

    Ok(ProfileVisit::Visited { user, messages })
}

fn message_form(user: &User) -> String {
    if !user.privacy.allow_new_messages {
        return include_res!(str, "/pages/components/messages_closed.html").to_string();
    }

    let anonymous = if user.privacy.allow_anonymous_users_messages {
        include_res!(str, "/pages/components/anonymous_option.html")
    } else {
        ""
    };
    include_res!(str, "/pages/components/message_form.html")
        .replace("{action}", &format!("/users/{}/messages", user.id))
        .replace("{anonymous_option}", anonymous)
}

#[debug_handler(state = AppState)]
pub(crate) async fn user_page(
    State(db): State<Db>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<Page>,
    Visitor(visitor): Visitor,
) -> AppResult<Response> {
    let (user, messages) = match visit_profile(&db, visitor.as_ref(), user_id, page).await? {
        ProfileVisit::Own => return Ok(Redirect::to("/messages").into_response()),
        ProfileVisit::Visited { user, messages } => (user, messages),
    };

    let visitors = if user.privacy.hide_visitors_count {
        String::new()
    } else {
        format!("<p class=\"visitors\">{} visitors</p>", user.num_of_visitors)
    };
    let messages = if messages.is_empty() {
        "<p>No public messages yet.</p>".to_string()
    } else {
        render::inbox_list(&messages, None)
    };

    Ok(Html(res::layout(
        &user.name,
        &include_res!(str, "/pages/user_page.html")
            .replace("{visitors}", &visitors)
            .replace("{message_form}", &message_form(&user))
            .replace("{gender}", user.gender.as_str())
            .replace("{joined_at}", &user.joined_at.date().to_string())
            .replace("{name}", &res::escape(&user.name))
            .replace("{bio}", &res::escape(&user.bio))
            .replace("{messages}", &messages),
    )).into_response())
}
