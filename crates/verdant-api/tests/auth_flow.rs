mod common;

use axum::http::{StatusCode, header};
use common::*;

#[tokio::test]
async fn register_then_login_roundtrip() {
    let app = app();

    let res = send(
        &app,
        form_post(
            "/register",
            "username=alice&email=alice@example.com&password=waterme123&confirm=waterme123",
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/login?notice="));
    // Registration does not log the user in.
    assert!(res.headers().get(header::SET_COOKIE).is_none());

    let res = send(
        &app,
        form_post("/login", "email=alice@example.com&password=waterme123", None),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    let cookie = session_cookie(&res);
    assert!(cookie.starts_with("verdant_session="));

    let res = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let page = json_body(res).await;
    assert_eq!(page["username"], "alice");
    assert_eq!(page["plants"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn mismatched_confirmation_is_rejected() {
    let app = app();

    let res = send(
        &app,
        form_post(
            "/register",
            "username=alice&email=alice@example.com&password=waterme123&confirm=different",
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/register?notice="));

    // No account was created.
    let res = send(
        &app,
        form_post("/login", "email=alice@example.com&password=waterme123", None),
    )
    .await;
    assert_eq!(location(&res), "/login?notice=Invalid%20credentials");
}

#[tokio::test]
async fn duplicate_email_registration_fails() {
    let app = app();
    let cookie = register_and_login(&app, "alice", "alice@example.com").await;

    let res = send(
        &app,
        form_post(
            "/register",
            "username=impostor&email=alice@example.com&password=stolen123&confirm=stolen123",
            None,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/register?notice=That%20email"));

    // The original account is untouched.
    let res = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = send(
        &app,
        form_post("/login", "email=alice@example.com&password=waterme123", None),
    )
    .await;
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = app();
    register_and_login(&app, "alice", "alice@example.com").await;

    let res = send(
        &app,
        form_post("/login", "email=alice@example.com&password=nope12345", None),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login?notice=Invalid%20credentials");
}

#[tokio::test]
async fn protected_routes_redirect_without_session() {
    let app = app();

    let res = send(&app, get("/", None)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/login?notice="));

    let res = send(
        &app,
        form_post("/add", "name=Fern&species=Pothos&last_watered=2024-01-01", None),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/login?notice="));

    // A garbage cookie is no better than none.
    let res = send(&app, get("/", Some("verdant_session=forged-token"))).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/login?notice="));
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = app();
    let cookie = register_and_login(&app, "alice", "alice@example.com").await;

    let res = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/login?notice="));

    // The old token no longer resolves.
    let res = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/login?notice="));
}
