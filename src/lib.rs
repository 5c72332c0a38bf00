//! # User Profile Service
//!
//! Profile, login and logout HTTP endpoints backed by a single user record
//! stored in a JSON file.
//!
//! ## Architecture
//!
//! - **domain**: The user record and the store interface
//! - **application**: `CredentialService`, the credential checks
//! - **infrastructure**: JSON file / in-memory stores, password hashing
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Process runtime and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::{CredentialService, ValidationOutcome};
pub use domain::{UserRecord, UserRecordStore};
pub use infrastructure::{InMemoryUserStore, JsonFileUserStore};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiOptions};
