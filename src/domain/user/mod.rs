//! User record aggregate
//!
//! Contains the record entity and the store interface it is loaded through.

pub mod model;
pub mod repository;

pub use model::UserRecord;
pub use repository::UserRecordStore;
