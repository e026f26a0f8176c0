pub mod admin;
pub mod flash;
pub mod middleware;
pub mod public;
pub mod state;
pub mod templates;
pub mod uploads;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use tower_http::{
    compression::CompressionLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let upload_dir = state.service_context.uploads.dir().to_path_buf();
    let max_body_bytes = state.settings.uploads.max_body_bytes;

    Router::new()
        // Public site
        .route("/", get(public::index))
        .route("/news", get(public::news))
        .route("/gallery", get(public::gallery))
        .route("/contact", get(public::contact_page).post(public::contact_submit))
        .route("/health", get(public::health_check))

        // Admin panel
        .merge(admin::create_admin_routes(state.clone()))

        // Stored gallery images, served as-is
        .nest_service("/uploads", ServeDir::new(upload_dir))

        .with_state(state)

        // Middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
