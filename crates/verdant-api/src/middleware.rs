use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;
use uuid::Uuid;

use crate::auth::AppState;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "verdant_session";

/// Identity resolved from the session cookie, inserted into request
/// extensions before protected handlers run.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// Map the session cookie to a user. `Ok(None)` covers every way a session
/// can be invalid (no cookie, unknown token, expired, user gone); an `Err`
/// is an infrastructure failure. Expired rows are deleted on sight.
pub fn resolve_session(state: &AppState, jar: &CookieJar) -> anyhow::Result<Option<CurrentUser>> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let token = cookie.value();

    let Some(session) = state.db.get_session(token)? else {
        return Ok(None);
    };

    let expires_at = crate::parse_db_time(&session.expires_at, "session expiry");
    if expires_at <= chrono::Utc::now() {
        state.db.delete_session(token)?;
        return Ok(None);
    }

    let Some(user) = state.db.get_user_by_id(&session.user_id)? else {
        return Ok(None);
    };

    let id = user
        .id
        .parse::<Uuid>()
        .map_err(|e| anyhow::anyhow!("corrupt user id '{}': {}", user.id, e))?;

    Ok(Some(CurrentUser { id, username: user.username }))
}

/// Gate for protected routes: redirect to the login form unless the request
/// carries a valid session.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_session(&state, &jar) {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(None) => ApiError::Unauthenticated.into_response(),
        Err(e) => {
            error!("session lookup failed: {:#}", e);
            ApiError::Database(e).into_response()
        }
    }
}
