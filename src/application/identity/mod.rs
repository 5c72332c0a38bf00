//! Identity module — credential checks against the stored user record
//!
//! Contains the `CredentialService` which answers the profile, login and
//! logout queries.

pub mod outcome;
pub mod service;

pub use outcome::ValidationOutcome;
pub use service::{CandidateField, CredentialService};
