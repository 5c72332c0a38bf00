pub mod identity;

pub use identity::{CandidateField, CredentialService, ValidationOutcome};
