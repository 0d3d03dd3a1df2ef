use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::forum;
use crate::middleware::require_session;
use crate::plants;

/// Assemble the full route table. Public and session-gated routes live in
/// separate routers so the session middleware wraps exactly the gated set.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/register", get(auth::register_page))
        .route("/register", post(auth::register))
        .route("/login", get(auth::login_page))
        .route("/login", post(auth::login))
        .route("/forum", get(forum::forum_list))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/", get(plants::list_plants))
        .route("/add", get(plants::add_plant_page))
        .route("/add", post(plants::add_plant))
        .route("/edit/{plant_id}", get(plants::edit_plant_page))
        .route("/edit/{plant_id}", post(plants::edit_plant))
        .route("/plant/{plant_id}", get(plants::plant_detail))
        .route("/water/{plant_id}", post(plants::water_plant))
        .route("/delete/{plant_id}", post(plants::delete_plant))
        .route("/delete_selected_plants", post(plants::delete_selected_plants))
        .route("/forum/new", get(forum::new_post_page))
        .route("/forum/new", post(forum::create_post))
        .route("/logout", get(auth::logout))
        .layer(middleware::from_fn_with_state(state.clone(), require_session))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
