mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn forum_is_public_but_posting_requires_login() {
    let app = app();

    let res = send(&app, get("/forum", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let page = json_body(res).await;
    assert!(page["username"].is_null());
    assert_eq!(page["posts"].as_array().unwrap().len(), 0);

    let res = send(&app, form_post("/forum/new", "title=Hi&content=First", None)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/login?notice="));
}

#[tokio::test]
async fn posting_lists_newest_first_with_author() {
    let app = app();
    let cookie = register_and_login(&app, "alice", "alice@example.com").await;

    let page = json_body(send(&app, get("/forum/new", Some(&cookie))).await).await;
    assert_eq!(page["username"], "alice");

    let res = send(
        &app,
        form_post(
            "/forum/new",
            "title=Repotting%20tips&content=Use%20fresh%20soil",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/forum");

    send(
        &app,
        form_post(
            "/forum/new",
            "title=Yellow%20leaves&content=Overwatering%3F",
            Some(&cookie),
        ),
    )
    .await;

    let page = json_body(send(&app, get("/forum", Some(&cookie))).await).await;
    assert_eq!(page["username"], "alice");
    let posts = page["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "Yellow leaves");
    assert_eq!(posts[1]["title"], "Repotting tips");
    assert_eq!(posts[0]["author_username"], "alice");
    assert_eq!(posts[0]["content"], "Overwatering?");
}

#[tokio::test]
async fn empty_title_redirects_back_to_the_form() {
    let app = app();
    let cookie = register_and_login(&app, "alice", "alice@example.com").await;

    let res = send(&app, form_post("/forum/new", "title=&content=Hello", Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/forum/new?notice="));

    let page = json_body(send(&app, get("/forum", Some(&cookie))).await).await;
    assert_eq!(page["posts"].as_array().unwrap().len(), 0);
}
