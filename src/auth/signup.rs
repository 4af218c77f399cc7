use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    appresult::is_unique_violation,
    db::Db,
    include_res,
    models::{Gender, NewUser, User},
    res, AppError, AppResult, AppState,
};

use super::{
    login::INBOX,
    password::{hash_password, MIN_PASSWORD_LEN},
    Visitor,
};

pub const MAX_NAME_LEN: usize = 127;
pub const MAX_EMAIL_LEN: usize = 254;

#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub password: String,
}

/// The register form as posted. Every field may be missing or malformed;
/// converting it into a [`Registration`] turns those cases into validation
/// errors instead of extractor rejections.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub password: String,
}

impl TryFrom<RegistrationForm> for Registration {
    type Error = AppError;

    fn try_from(form: RegistrationForm) -> AppResult<Self> {
        let gender = match form.gender.trim() {
            "" => Gender::default(),
            code => Gender::try_from(code.to_string())
                .map_err(|_| AppError::validation("gender must be M or F"))?,
        };

        Ok(Registration {
            name: form.name,
            email: form.email,
            gender,
            password: form.password,
        })
    }
}

pub(crate) fn check_name(name: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!("name is longer than {MAX_NAME_LEN} characters")));
    }
    Ok(())
}

pub(crate) fn check_email(email: &str) -> AppResult<()> {
    if email.is_empty() {
        return Err(AppError::validation("email is required"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(AppError::validation("email is too long"));
    }
    Ok(())
}

/// Creates the account. Only the password hash is stored.
pub async fn register(db: &Db, form: Registration) -> AppResult<User> {
    let name = form.name.trim();
    let email = form.email.trim();
    check_name(name)?;
    check_email(email)?;
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password minimum length is {MIN_PASSWORD_LEN}"
        )));
    }

    let new_user = NewUser {
        email: email.to_string(),
        name: name.to_string(),
        gender: form.gender,
        hashed_password: hash_password(&form.password)?,
    };

    match db.create_user(&new_user).await {
        Ok(user) => Ok(user),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::validation("email is already registered"))
        }
        Err(e) => Err(e.into()),
    }
}

fn register_form(alert: &str) -> String {
    res::layout(
        "Register",
        &include_res!(str, "/pages/register.html").replace("{alert}", alert),
    )
}

#[debug_handler(state = AppState)]
pub(crate) async fn register_page(Visitor(visitor): Visitor) -> Response {
    if visitor.is_some() {
        return Redirect::to(INBOX).into_response();
    }
    Html(register_form("")).into_response()
}

#[debug_handler(state = AppState)]
pub(crate) async fn register_submit(
    State(db): State<Db>,
    Form(form): Form<RegistrationForm>,
) -> Response {
    let registered = match Registration::try_from(form) {
        Ok(registration) => register(&db, registration).await,
        Err(e) => Err(e),
    };

    match registered {
        Ok(user) => {
            info!("registered user {}", user.id);
            Redirect::to("/login").into_response()
        }
        Err(AppError::Validation(msg)) => {
            (StatusCode::BAD_REQUEST, Html(register_form(&res::alert("danger", &msg))))
                .into_response()
        }
        Err(e) => {
            warn!("registration failed: {e:?}");
            (e.status(), Html(register_form(&res::alert("danger", res::TRY_AGAIN)))).into_response()
        }
    }
}
