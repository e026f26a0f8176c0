pub mod auth;
pub mod dashboard;
pub mod news;
pub mod photos;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};
use serde::Deserialize;

use crate::web::state::AppState;

/// Body of the delete buttons, which carry nothing but the token.
#[derive(Debug, Default, Deserialize)]
pub struct CsrfForm {
    #[serde(default)]
    pub csrf_token: String,
}

pub fn create_admin_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/admin", get(dashboard::dashboard))
        // News
        .route("/admin/news/add", get(news::add_news_page).post(news::create_news))
        .route("/admin/news/:id/edit", get(news::edit_news_page).post(news::update_news))
        .route("/admin/news/:id/delete", post(news::delete_news))
        // Photos
        .route("/admin/photos/add", get(photos::add_photo_page).post(photos::create_photo))
        .route("/admin/photos/:id/edit", get(photos::edit_photo_page).post(photos::update_photo))
        .route("/admin/photos/:id/delete", post(photos::delete_photo))
        // Everything above requires a logged-in admin
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::web::middleware::require_admin,
        ));

    Router::new()
        .route("/admin/login", get(auth::login_page).post(auth::login_handler))
        .route("/admin/logout", get(auth::logout_handler))
        .merge(protected)
}
