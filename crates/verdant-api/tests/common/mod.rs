#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use verdant_api::auth::{AppState, AppStateInner};
use verdant_api::routes::router;
use verdant_db::Database;

pub fn app() -> Router {
    let db = Database::open(Path::new(":memory:")).expect("open in-memory db");
    let state: AppState = Arc::new(AppStateInner { db, session_ttl_days: 30 });
    router(state)
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).expect("request build")
}

pub fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(body.to_string())).expect("request build")
}

pub fn location(res: &Response<Body>) -> &str {
    res.headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

pub fn session_cookie(res: &Response<Body>) -> String {
    let raw = res
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("ascii cookie");
    raw.split(';').next().expect("cookie pair").to_string()
}

pub async fn json_body(res: Response<Body>) -> serde_json::Value {
    let bytes = res.into_body().collect().await.expect("read body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn register_and_login(app: &Router, username: &str, email: &str) -> String {
    let body = format!(
        "username={}&email={}&password=waterme123&confirm=waterme123",
        username, email
    );
    let res = send(app, form_post("/register", &body, None)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let body = format!("email={}&password=waterme123", email);
    let res = send(app, form_post("/login", &body, None)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    session_cookie(&res)
}

/// Add a plant through the form endpoint and return its id, read back from
/// the top of the list page.
pub async fn add_plant(app: &Router, cookie: &str, name: &str, species: &str, date: &str) -> String {
    let body = format!("name={}&species={}&last_watered={}", name, species, date);
    let res = send(app, form_post("/add", &body, Some(cookie))).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let res = send(app, get("/", Some(cookie))).await;
    let page = json_body(res).await;
    page["plants"][0]["id"].as_str().expect("plant id").to_string()
}
