use std::collections::HashSet;

use axum::{
    debug_handler,
    extract::{Query, State},
    response::Html,
};
use uuid::Uuid;

use crate::{
    auth::{ApiUser, LoggedIn},
    db::{Db, Page},
    include_res,
    models::{InboxEntry, SentEntry, User},
    res, AppResult, AppState,
};

use super::render;

#[derive(Debug)]
pub struct ReceivedInbox {
    /// As the receiver saw it before opening: just-seen messages still
    /// read as unseen.
    pub entries: Vec<InboxEntry>,
    pub newly_seen: Vec<Uuid>,
}

/// Opens the received inbox, marking every unseen message as seen.
pub async fn open_received(db: &Db, user: &User, page: Page) -> AppResult<ReceivedInbox> {
    let newly_seen = db.set_user_messages_seen(user.id).await?;
    let fresh: HashSet<Uuid> = newly_seen.iter().copied().collect();

    let entries = db
        .received_messages(user.id, page)
        .await?
        .into_iter()
        .map(InboxEntry::from)
        .map(|mut entry| {
            if fresh.contains(&entry.id) {
                entry.is_seen = false;
            }
            entry
        })
        .collect();

    Ok(ReceivedInbox { entries, newly_seen })
}

pub async fn sent(db: &Db, user: &User, page: Page) -> AppResult<Vec<SentEntry>> {
    Ok(db
        .sent_messages(user.id, page)
        .await?
        .into_iter()
        .map(SentEntry::from)
        .collect())
}

pub async fn favorites(db: &Db, user: &User, page: Page) -> AppResult<Vec<InboxEntry>> {
    Ok(db
        .fav_messages(user.id, page)
        .await?
        .into_iter()
        .map(InboxEntry::from)
        .collect())
}

fn empty(text: &str) -> Html<String> {
    Html(include_res!(str, "/pages/components/no_messages.html").replace("{text}", text))
}

#[debug_handler(state = AppState)]
pub(crate) async fn messages_page(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
) -> Html<String> {
    Html(res::layout(
        "Messages",
        &include_res!(str, "/pages/messages.html")
            .replace("{received_url}", &state.config.api("/messages"))
            .replace("{sent_url}", &state.config.api("/messages/sent"))
            .replace("{fav_url}", &state.config.api("/messages/fav"))
            .replace("{id}", &user.id.to_string())
            .replace("{name}", &res::escape(&user.name)),
    ))
}

#[debug_handler(state = AppState)]
pub(crate) async fn received_messages(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Query(page): Query<Page>,
) -> AppResult<Html<String>> {
    let inbox = open_received(&state.db, &user, page).await?;
    if inbox.entries.is_empty() {
        return Ok(empty("No messages yet. Share your profile link to receive some."));
    }
    Ok(Html(render::inbox_list(&inbox.entries, Some(&state.config.api_version))))
}

#[debug_handler(state = AppState)]
pub(crate) async fn sent_messages(
    State(db): State<Db>,
    ApiUser(user): ApiUser,
    Query(page): Query<Page>,
) -> AppResult<Html<String>> {
    let entries = sent(&db, &user, page).await?;
    if entries.is_empty() {
        return Ok(empty("You have not sent any messages."));
    }
    Ok(Html(render::sent_list(&entries)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn fav_messages(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Query(page): Query<Page>,
) -> AppResult<Html<String>> {
    let entries = favorites(&state.db, &user, page).await?;
    if entries.is_empty() {
        return Ok(empty("No favorites yet."));
    }
    Ok(Html(render::inbox_list(&entries, Some(&state.config.api_version))))
}
