use axum::{
    debug_handler,
    extract::{Query, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    db::Db, include_res, models::User, res, AppError, AppResult, AppState,
};

use super::{password::verify_password, session::session_cookie, Visitor};

pub(crate) const INBOX: &str = "/messages";

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) next: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(alias = "username")]
    email: String,
    password: String,
}

pub async fn authenticate(db: &Db, email: &str, password: &str) -> AppResult<User> {
    let Some(user) = db.get_user_by_email(email.trim()).await? else {
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.hashed_password) {
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

fn return_target(next: Option<String>) -> String {
    next.filter(|n| res::is_local_path(n))
        .unwrap_or(INBOX.to_string())
}

fn login_form(next: Option<&str>, alert: &str) -> String {
    let action = match next.filter(|n| res::is_local_path(n)) {
        Some(next) => res::login_url(next),
        None => "/login".to_string(),
    };
    res::layout(
        "Log in",
        &include_res!(str, "/pages/login.html")
            .replace("{action}", &res::escape(&action))
            .replace("{alert}", alert),
    )
}

#[debug_handler(state = AppState)]
pub(crate) async fn login_page(
    Query(LoginQuery { next }): Query<LoginQuery>,
    Visitor(visitor): Visitor,
) -> Response {
    if visitor.is_some() {
        return Redirect::to(INBOX).into_response();
    }

    Html(login_form(next.as_deref(), "")).into_response()
}

#[debug_handler]
pub(crate) async fn login(
    State(state): State<AppState>,
    Query(LoginQuery { next }): Query<LoginQuery>,
    Form(LoginForm { email, password }): Form<LoginForm>,
) -> AppResult<Response> {
    let user = match authenticate(&state.db, &email, &password).await {
        Ok(user) => user,
        Err(AppError::InvalidCredentials) => {
            warn!("failed login for {email}");
            let alert = res::alert("danger", "Incorrect email or password");
            let page = Html(login_form(next.as_deref(), &alert));
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
        Err(e) => return Err(e),
    };

    let token = state.tokens.issue(&user, state.config.access_token_ttl)?;
    let cookie = session_cookie(token, &state.config);
    info!("user {} logged in", user.id);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Redirect::to(&return_target(next)),
    ).into_response())
}
