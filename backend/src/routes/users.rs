use std::sync::Arc;

use axum::{Extension, Json};
use registration_storage::user::{UserRecord, UserStore};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::types::AppError;

/// Every stored user record
#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    /// Records in storage-engine order
    pub users: Vec<UserRecord>,
}

/// Lists all registered users, unfiltered and unpaginated
///
/// # Errors
///
/// Returns a 500 `AppError` if the database query fails
#[instrument(skip(user_store))]
pub async fn list_users(
    Extension(user_store): Extension<Arc<dyn UserStore>>,
) -> Result<Json<UsersResponse>, AppError> {
    let users = user_store.list_all().await?;

    tracing::debug!(count = users.len(), "Listed users");

    Ok(Json(UsersResponse { users }))
}
