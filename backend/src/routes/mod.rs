mod form;
mod health;
mod upload;
mod users;

use axum::{
    routing::{get, post},
    Router,
};

/// Creates the router with all handler routes
///
/// Handlers expect `Arc<dyn BlobStore>` and `Arc<dyn UserStore>` extensions.
pub fn handler() -> Router {
    Router::new()
        .route("/", get(form::handler))
        .route("/upload", post(upload::upload_user_data))
        .route("/users", get(users::list_users))
        .route("/health", get(health::handler))
}
