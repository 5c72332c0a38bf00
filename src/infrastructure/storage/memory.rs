//! In-memory user record store, for tests and embedding

use async_trait::async_trait;

use crate::domain::{UserRecord, UserRecordStore};
use crate::shared::StoreError;

/// Store backed by a record held in memory.
///
/// An empty store behaves like an unreadable file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    record: Option<UserRecord>,
}

impl InMemoryUserStore {
    pub fn new(record: UserRecord) -> Self {
        Self {
            record: Some(record),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRecordStore for InMemoryUserStore {
    async fn load(&self) -> Result<UserRecord, StoreError> {
        self.record.clone().ok_or(StoreError::Empty)
    }
}
