mod login;
mod logout;
pub(crate) mod signup;

pub mod password;
pub mod session;
pub mod token;

use axum::{routing::get, Router};
use tracing::debug;

use crate::{db::Db, models::User, AppResult, AppState};

pub use login::authenticate;
pub use signup::{register, Registration, RegistrationForm};
pub use session::{ApiUser, LoggedIn, Visitor};
pub use token::TokenKeys;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(signup::register_page).post(signup::register_submit))
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", get(logout::logout))
}

/// Maps a session token back to its user. A token that fails verification
/// or names an unknown email is no session at all, not an error.
pub async fn resolve_session(db: &Db, tokens: &TokenKeys, token: &str) -> AppResult<Option<User>> {
    let claims = match tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("ignoring session token: {e}");
            return Ok(None);
        }
    };

    Ok(db.get_user_by_email(&claims.email).await?)
}
