use axum::{
    debug_handler,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect},
};

use super::session::removal_cookie;

#[debug_handler]
pub(crate) async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, removal_cookie().to_string())]),
        Redirect::to("/login"),
    )
}
