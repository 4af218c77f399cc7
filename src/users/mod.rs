mod page;
mod profile;
mod search;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub use page::{visit_profile, ProfileVisit};
pub use profile::{update_privacy_settings, update_user_info, MAX_BIO_LEN};
pub use search::search_users;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::profile_page))
        .route("/search", get(search::search_page))
        .route("/users/{user_id}", get(page::user_page))
}

/// Fragment endpoints, mounted under the api prefix.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/info", post(profile::update_info))
        .route("/privacy", post(profile::update_privacy))
        .route("/users", get(search::search_results))
}
