#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use murmur::{
    auth::{register, Registration},
    models::{Gender, User},
    AppState, Config, Db,
};
use tower::ServiceExt;

pub const PASSWORD: &str = "secret1";

pub fn config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("test-secret".to_string()),
        _ => None,
    })
    .unwrap()
}

pub async fn state() -> AppState {
    AppState::new(Db::in_memory().await.unwrap(), config())
}

pub async fn user(db: &Db, name: &str, email: &str) -> User {
    register(
        db,
        Registration {
            name: name.to_string(),
            email: email.to_string(),
            gender: Gender::F,
            password: PASSWORD.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder =
        Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn patch_json(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::patch(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// The `name=value` pair of the response's session cookie.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("auth_token="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}
