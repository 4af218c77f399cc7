use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::COOKIE, request::Parts},
};
use cookie::{Cookie, SameSite};

use crate::{config::Config, models::User, AppError, AppState};

use super::resolve_session;

pub const AUTH_COOKIE: &str = "auth_token";

pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(cookie::time::Duration::seconds(config.access_token_ttl.whole_seconds()))
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((AUTH_COOKIE, "")).path("/").http_only(true).build();
    cookie.make_removal();
    cookie
}

pub(crate) fn session_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == AUTH_COOKIE && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}

/// Whoever sent the request; `None` for visitors without a valid session.
pub struct Visitor(pub Option<User>);

/// A page that needs a session. Without one the visitor is sent to the
/// login page and brought back afterwards.
pub struct LoggedIn(pub User);

/// An api call that needs a session. Without one it fails with 401.
pub struct ApiUser(pub User);

impl<S> FromRequestParts<S> for Visitor
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Ok(Visitor(None));
        };
        let state = AppState::from_ref(state);
        Ok(Visitor(resolve_session(&state.db, &state.tokens, &token).await?))
    }
}

impl<S> FromRequestParts<S> for LoggedIn
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Visitor::from_request_parts(parts, state).await? {
            Visitor(Some(user)) => Ok(LoggedIn(user)),
            Visitor(None) => Err(AppError::RequiresLogin {
                next: parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string()),
            }),
        }
    }
}

impl<S> FromRequestParts<S> for ApiUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Visitor::from_request_parts(parts, state).await? {
            Visitor(Some(user)) => Ok(ApiUser(user)),
            Visitor(None) => Err(AppError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(cookies: &[&str]) -> Parts {
        let mut builder = Request::builder().uri("/messages");
        for c in cookies {
            builder = builder.header(COOKIE, *c);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn finds_token_among_cookies() {
        let parts = parts(&["theme=dark; auth_token=abc.def.ghi", "other=1"]);
        assert_eq!(session_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        assert_eq!(session_token(&parts(&[])), None);
        assert_eq!(session_token(&parts(&["auth_token="])), None);
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let header = removal_cookie().to_string();
        assert!(header.starts_with("auth_token=;"));
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("HttpOnly"));
    }
}
