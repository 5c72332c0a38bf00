pub mod user;

pub use user::{UserRecord, UserRecordStore};

pub use crate::shared::{DomainError, DomainResult};
