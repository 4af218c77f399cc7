pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod messages;
pub mod models;
pub mod res;
pub mod users;

use std::sync::Arc;

use axum::{extract::FromRef, response::Redirect, routing::get, Router};
use tower_http::trace::TraceLayer;

pub use appresult::{AppError, AppResult};
pub use auth::TokenKeys;
pub use config::Config;
pub use db::Db;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Db,
    pub tokens: TokenKeys,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Db, config: Config) -> Self {
        AppState {
            db,
            tokens: TokenKeys::from_config(&config),
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let api = state.config.api_version.clone();

    Router::new()
        .route("/", get(|| async { Redirect::to("/messages") }))
        .merge(auth::router())
        .merge(users::router())
        .merge(messages::router())
        .nest(&api, users::api_router().merge(messages::api_router()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
