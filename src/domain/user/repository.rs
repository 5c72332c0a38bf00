use async_trait::async_trait;

use super::UserRecord;
use crate::shared::StoreError;

/// Read-only access to the canonical user record.
///
/// Implementations must return a fresh copy on every call; callers never
/// cache the result.
#[async_trait]
pub trait UserRecordStore: Send + Sync {
    async fn load(&self) -> Result<UserRecord, StoreError>;
}
