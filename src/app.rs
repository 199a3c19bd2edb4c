use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/upload", get(handlers::upload_page))
        .route("/dashboard", get(handlers::dashboard_page))
        .route(
            "/api/files",
            get(handlers::list_files)
                .post(handlers::add_files)
                .delete(handlers::clear_files),
        )
        .route("/api/files/:index", delete(handlers::remove_file))
        .route("/api/submit", post(handlers::submit))
        .route(
            "/api/dashboard",
            get(handlers::get_dashboard).delete(handlers::clear_dashboard),
        )
        .route("/api/summary", post(handlers::regenerate_summary))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
