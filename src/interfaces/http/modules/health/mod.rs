//! Liveness and storage readiness

pub mod handlers;

pub use handlers::*;
