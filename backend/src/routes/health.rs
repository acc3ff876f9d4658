use axum::Json;
use serde::{Deserialize, Serialize};

/// Health check payload
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy`
    pub status: String,
}

/// Health check endpoint
///
/// Reports the process as healthy without probing the database or the object store.
#[allow(clippy::unused_async)]
pub async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
