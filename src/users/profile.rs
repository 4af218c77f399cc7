use axum::{
    debug_handler,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form,
};
use tracing::{info, warn};

use crate::{
    appresult::is_unique_violation,
    auth::{
        signup::{check_email, check_name},
        session::session_cookie,
        LoggedIn, Visitor,
    },
    db::Db,
    include_res,
    models::{Gender, PrivacySettings, User, UserInfo},
    res, AppError, AppResult, AppState,
};

pub const MAX_BIO_LEN: usize = 300;

const PROFILE: &str = "/profile";

/// Applies the non-empty fields of `info` that differ from the stored ones.
pub async fn update_user_info(db: &Db, user: &User, info: UserInfo) -> AppResult<User> {
    fn pick<'a>(given: &'a str, current: &'a str) -> &'a str {
        let given = given.trim();
        if given.is_empty() || given == current { current } else { given }
    }

    let name = pick(&info.name, &user.name);
    let email = pick(&info.email, &user.email);
    let bio = pick(&info.bio, &user.bio);
    let gender = info.gender.unwrap_or(user.gender);

    check_name(name)?;
    check_email(email)?;
    if bio.chars().count() > MAX_BIO_LEN {
        return Err(AppError::validation(format!("bio is longer than {MAX_BIO_LEN} characters")));
    }

    match db.update_user_info(user.id, name, email, gender, bio).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(AppError::NotFound("user")),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::validation("email is already registered"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn update_privacy_settings(
    db: &Db,
    user: &User,
    settings: PrivacySettings,
) -> AppResult<User> {
    db.update_privacy_settings(user.id, &settings)
        .await?
        .ok_or(AppError::NotFound("user"))
}

fn checked(flag: bool) -> &'static str {
    if flag { "checked" } else { "" }
}

fn selected(gender: Gender, option: Gender) -> &'static str {
    if gender == option { "selected" } else { "" }
}

fn failure_alert(e: &AppError) -> String {
    match e {
        AppError::Validation(msg) => res::alert("danger", msg),
        _ => res::alert("danger", res::TRY_AGAIN),
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn profile_page(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
) -> Html<String> {
    let p = &user.privacy;
    Html(res::layout(
        "Profile",
        &include_res!(str, "/pages/profile.html")
            .replace("{info_action}", &state.config.api("/info"))
            .replace("{privacy_action}", &state.config.api("/privacy"))
            .replace("{gender_m}", selected(user.gender, Gender::M))
            .replace("{gender_f}", selected(user.gender, Gender::F))
            .replace("{allow_new_messages}", checked(p.allow_new_messages))
            .replace("{allow_sending_images}", checked(p.allow_sending_images))
            .replace("{allow_anonymous_users_messages}", checked(p.allow_anonymous_users_messages))
            .replace("{allow_notifications}", checked(p.allow_notifications))
            .replace("{hide_visitors_count}", checked(p.hide_visitors_count))
            .replace("{hide_last_seen}", checked(p.hide_last_seen))
            .replace("{appear_in_search_results}", checked(p.appear_in_search_results))
            .replace("{visitors}", &user.num_of_visitors.to_string())
            .replace("{id}", &user.id.to_string())
            .replace("{name}", &res::escape(&user.name))
            .replace("{email}", &res::escape(&user.email))
            .replace("{bio}", &res::escape(&user.bio)),
    ))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_info(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(info): Form<UserInfo>,
) -> AppResult<Response> {
    let Some(user) = visitor else {
        return Err(AppError::RequiresLogin { next: PROFILE.to_string() });
    };

    let updated = match update_user_info(&state.db, &user, info).await {
        Ok(updated) => updated,
        Err(e) => {
            warn!("profile update for {} failed: {e:?}", user.id);
            return Ok(Html(failure_alert(&e)).into_response());
        }
    };
    info!("user {} updated their profile", updated.id);

    if updated.email != user.email {
        // the session token names the email, so it has to follow the change
        let token = state.tokens.issue(&updated, state.config.access_token_ttl)?;
        let cookie = session_cookie(token, &state.config);
        let headers = AppendHeaders([(SET_COOKIE, cookie.to_string())]);
        return Ok((headers, Redirect::to(PROFILE)).into_response());
    }

    Ok(Redirect::to(PROFILE).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_privacy(
    State(db): State<Db>,
    Visitor(visitor): Visitor,
    Form(settings): Form<PrivacySettings>,
) -> AppResult<Response> {
    let Some(user) = visitor else {
        return Err(AppError::RequiresLogin { next: PROFILE.to_string() });
    };

    match update_privacy_settings(&db, &user, settings).await {
        Ok(_) => Ok(Redirect::to(PROFILE).into_response()),
        Err(e) => {
            warn!("privacy update for {} failed: {e:?}", user.id);
            Ok(Html(failure_alert(&e)).into_response())
        }
    }
}
