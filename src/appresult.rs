use axum::{http::StatusCode, response::{Html, IntoResponse, Redirect, Response}};
use thiserror::Error;
use tracing::error;

use crate::res;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("login required for {next}")]
    RequiresLogin { next: String },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("could not validate credentials")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// The error as shown to a visitor, capitalised.
    pub fn user_message(&self) -> String {
        let mut msg = self.to_string();
        if let Some(first) = msg.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        msg
    }

    pub fn status(&self) -> StatusCode {
        use AppError::*;
        match self {
            InvalidCredentials | Unauthorized => StatusCode::UNAUTHORIZED,
            Validation(_) => StatusCode::BAD_REQUEST,
            RequiresLogin { .. } => StatusCode::FOUND,
            NotFound(_) => StatusCode::NOT_FOUND,
            PermissionDenied(_) => StatusCode::FORBIDDEN,
            Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(anyhow::Error::from(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::RequiresLogin { next } => {
                Redirect::to(&res::login_url(&next)).into_response()
            }
            AppError::Internal(err) => {
                error!("internal error: {err:?}");
                (status, Html(res::alert("danger", res::TRY_AGAIN))).into_response()
            }
            AppError::NotFound(what) => {
                (status, Html(res::not_found(what))).into_response()
            }
            AppError::Unauthorized => {
                (
                    status,
                    [(axum::http::header::WWW_AUTHENTICATE, "Bearer")],
                    Html(res::alert("danger", &AppError::Unauthorized.user_message())),
                ).into_response()
            }
            other => {
                let msg = other.user_message();
                (status, Html(res::alert("danger", &msg))).into_response()
            }
        }
    }
}


/// True when a database error was raised by a UNIQUE constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
