use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

/// Failures a route handler can surface. Business failures turn into the
/// form-app redirect dance; infrastructure failures become 500s instead of
/// being swallowed.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation failed: {message}")]
    Validation { message: String, back: String },

    #[error("record missing or not owned by caller")]
    NotFoundOrForbidden,

    #[error("email is already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no valid session")]
    Unauthenticated,

    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { message, back } => {
                Redirect::to(&with_notice(&back, &message)).into_response()
            }
            // Missing and foreign records are indistinguishable to the caller.
            ApiError::NotFoundOrForbidden => Redirect::to("/").into_response(),
            ApiError::DuplicateEmail => {
                Redirect::to(&with_notice("/register", "That email is already registered"))
                    .into_response()
            }
            ApiError::InvalidCredentials => {
                Redirect::to(&with_notice("/login", "Invalid credentials")).into_response()
            }
            ApiError::Unauthenticated => {
                Redirect::to(&with_notice("/login", "You must be logged in to view this page"))
                    .into_response()
            }
            ApiError::Database(e) => {
                error!("database failure: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Build `path?notice=...`, the flash-message equivalent. Notices are short
/// ASCII phrases produced by the handlers themselves, so a minimal
/// percent-encoding suffices.
pub fn with_notice(path: &str, message: &str) -> String {
    let mut encoded = String::with_capacity(message.len());
    for b in message.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(b as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", b)),
        }
    }
    format!("{}?notice={}", path, encoded)
}
