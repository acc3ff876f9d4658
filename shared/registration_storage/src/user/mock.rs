//! In-memory user store for tests

use chrono::Utc;
use tokio::sync::Mutex;

use super::{NewUserRecord, UserRecord, UserStorageResult, UserStore};

/// User store keeping records in memory
///
/// Ids are assigned sequentially starting at 1, mirroring a fresh `SERIAL` column.
#[derive(Default)]
pub struct InMemoryUserStore {
    records: Mutex<Vec<UserRecord>>,
    fail_inserts: bool,
}

impl InMemoryUserStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose inserts always fail as if the pool were exhausted
    #[must_use]
    pub fn failing() -> Self {
        Self {
            records: Mutex::default(),
            fail_inserts: true,
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether no record has been stored
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, record: NewUserRecord) -> UserStorageResult<UserRecord> {
        if self.fail_inserts {
            return Err(sqlx::Error::PoolTimedOut.into());
        }

        let mut records = self.records.lock().await;
        let id = i32::try_from(records.len() + 1).unwrap_or(i32::MAX);

        let stored = UserRecord {
            id,
            user_id: record.user_id,
            name: record.name,
            address: record.address,
            image_url: record.image_url,
            created_at: Utc::now(),
        };
        records.push(stored.clone());

        Ok(stored)
    }

    async fn list_all(&self) -> UserStorageResult<Vec<UserRecord>> {
        Ok(self.records.lock().await.clone())
    }
}
