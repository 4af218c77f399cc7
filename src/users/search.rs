use axum::{
    debug_handler,
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::{
    db::{Db, Page},
    include_res,
    models::User,
    res, AppResult, AppState,
};

#[derive(Deserialize)]
pub(crate) struct SearchQuery {
    q: Option<String>,
}

/// A blank query matches nobody.
pub async fn search_users(db: &Db, q: &str, page: Page) -> AppResult<Vec<User>> {
    let q = q.trim();
    if q.is_empty() {
        return Ok(Vec::new());
    }
    Ok(db.search_users(q, page).await?)
}

fn user_item(user: &User) -> String {
    include_res!(str, "/pages/components/user_item.html")
        .replace("{id}", &user.id.to_string())
        .replace("{name}", &res::escape(&user.name))
        .replace("{email}", &res::escape(&user.email))
        .replace("{gender}", user.gender.as_str())
        .replace("{bio}", &res::escape(&user.bio))
        .replace("{joined_at}", &user.joined_at.date().to_string())
}

#[debug_handler(state = AppState)]
pub(crate) async fn search_page(State(state): State<AppState>) -> Html<String> {
    Html(res::layout(
        "Search",
        &include_res!(str, "/pages/search.html")
            .replace("{results_url}", &state.config.api("/users")),
    ))
}

#[debug_handler(state = AppState)]
pub(crate) async fn search_results(
    State(db): State<Db>,
    Query(SearchQuery { q }): Query<SearchQuery>,
    Query(page): Query<Page>,
) -> AppResult<Html<String>> {
    let users = search_users(&db, q.as_deref().unwrap_or(""), page).await?;
    if users.is_empty() {
        return Ok(Html(include_res!(str, "/pages/components/users_empty.html").to_string()));
    }

    Ok(Html(users.iter().map(user_item).collect()))
}
