use axum::{
    Extension, Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;
use uuid::Uuid;

use verdant_types::api::{ForumPage, NewPostForm, NewPostPage};
use verdant_types::models::ForumPost;

use crate::auth::{AppState, NoticeQuery};
use crate::error::ApiError;
use crate::middleware::{CurrentUser, resolve_session};
use crate::{parse_db_time, parse_id};

/// The forum is readable without an account; the viewer's name is included
/// when a valid session cookie happens to be present.
pub async fn forum_list(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let username = resolve_session(&state, &jar)?.map(|u| u.username);

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.get_forum_posts())
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); anyhow::anyhow!(e) })??;

    let posts = rows
        .into_iter()
        .map(|row| ForumPost {
            id: parse_id(&row.id),
            author_id: parse_id(&row.author_id),
            author_username: row.author_username,
            title: row.title,
            content: row.content,
            created_at: parse_db_time(&row.created_at, "forum post"),
        })
        .collect();

    Ok(Json(ForumPage { username, posts }))
}

pub async fn new_post_page(
    Query(query): Query<NoticeQuery>,
    Extension(user): Extension<CurrentUser>,
) -> Json<NewPostPage> {
    Json(NewPostPage {
        username: user.username,
        notice: query.notice,
    })
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<NewPostForm>,
) -> Result<impl IntoResponse, ApiError> {
    if form.title.trim().is_empty() || form.content.trim().is_empty() {
        return Err(ApiError::Validation {
            message: "Both a title and some content are required".into(),
            back: "/forum/new".into(),
        });
    }

    let post_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = state.clone();
    let uid = user.id.to_string();
    // Username is denormalized onto the post at creation time.
    let username = user.username;
    let title = form.title.trim().to_string();
    let content = form.content.trim().to_string();
    tokio::task::spawn_blocking(move || {
        let pid = post_id.to_string();
        db.db.create_forum_post(&pid, &uid, &username, &title, &content, now)
    })
    .await
    .map_err(|e| { error!("spawn_blocking join error: {}", e); anyhow::anyhow!(e) })??;

    Ok(Redirect::to("/forum"))
}
