use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Form, Json, extract::{Query, State}, response::{IntoResponse, Redirect}};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use rand::RngCore;
use serde::Deserialize;
use uuid::Uuid;

use verdant_db::Database;
use verdant_types::api::{AuthPage, LoginForm, RegisterForm};

use crate::error::{ApiError, with_notice};
use crate::middleware::SESSION_COOKIE;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session_ttl_days: i64,
}

/// Flash-equivalent notice carried on redirect targets, echoed back in the
/// page view-model for the template layer to render.
#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

pub async fn register_page(Query(query): Query<NoticeQuery>) -> Json<AuthPage> {
    Json(AuthPage { notice: query.notice })
}

pub async fn login_page(Query(query): Query<NoticeQuery>) -> Json<AuthPage> {
    Json(AuthPage { notice: query.notice })
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if form.username.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty() {
        return Err(ApiError::Validation {
            message: "All fields are required".into(),
            back: "/register".into(),
        });
    }
    if form.password != form.confirm {
        return Err(ApiError::Validation {
            message: "The passwords do not match".into(),
            back: "/register".into(),
        });
    }

    // Check if the email is taken
    if state.db.get_user_by_email(form.email.trim())?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(form.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();

    let user_id = Uuid::new_v4();

    state
        .db
        .create_user(&user_id.to_string(), form.username.trim(), form.email.trim(), &password_hash)?;

    // No auto-login: the user is sent to the login form.
    Ok(Redirect::to(&with_notice("/login", "Registration successful. You can now log in")))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_email(form.email.trim())?
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("stored hash unreadable for {}: {}", user.id, e))?;

    Argon2::default()
        .verify_password(form.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let token = new_session_token();
    let expires_at = chrono::Utc::now() + chrono::Duration::days(state.session_ttl_days);
    state.db.create_session(&token, &user.id, expires_at)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build();

    Ok((jar.add(cookie), Redirect::to("/")))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.db.delete_session(cookie.value())?;
    }

    let removal = Cookie::build(SESSION_COOKIE).path("/").build();
    let jar = jar.remove(removal);

    Ok((jar, Redirect::to(&with_notice("/login", "You have been logged out"))))
}

/// Opaque session token: 32 random bytes, base64url. All meaning lives in
/// the sessions table, so logout genuinely revokes it.
fn new_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    B64.encode(bytes)
}
