use std::sync::Arc;

use axum::{
    error_handling::HandleErrorLayer, extract::DefaultBodyLimit, http::StatusCode, BoxError,
    Extension, Router,
};
use registration_storage::user::{UserStorage, UserStore};
use tokio::net::TcpListener;
use tower::{
    timeout::{error::Elapsed, TimeoutLayer},
    ServiceBuilder,
};
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::{
    media_storage::BlobStore,
    types::{AppConfig, AppError},
};

/// Builds the application router with its dependencies and middleware
pub fn app(
    config: &AppConfig,
    media_storage: Arc<dyn BlobStore>,
    user_store: Arc<dyn UserStore>,
) -> Router {
    routes::handler()
        .layer(Extension(media_storage))
        .layer(Extension(user_store))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
}

/// Renders errors raised by the middleware stack as JSON errors
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        AppError::internal(format!("Unhandled internal error: {err}"))
    }
}

/// Starts the server with the given configuration and dependencies
///
/// Closes the database pool once in-flight requests have drained.
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    config: AppConfig,
    media_storage: Arc<dyn BlobStore>,
    user_storage: Arc<UserStorage>,
) -> anyhow::Result<()> {
    let router = app(&config, media_storage, user_storage.clone());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Registration backend started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    user_storage.close().await;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
