//! HTTP REST API interfaces
//!
//! - `common`: Shared response bodies
//! - `modules`: Request handlers grouped by resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiOptions};
