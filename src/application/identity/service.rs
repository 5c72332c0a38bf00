//! Credential service — application-layer orchestration
//!
//! All credential logic lives here. HTTP handlers are thin wrappers that
//! delegate to this service and map its results onto responses.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::outcome::ValidationOutcome;
use crate::domain::{DomainError, DomainResult, UserRecord, UserRecordStore};
use crate::infrastructure::crypto::password::verify_password;

/// A submitted login field.
///
/// `Other` is a present value that is not a string; it never equals a
/// stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateField<'a> {
    Text(&'a str),
    Other,
}

/// Answers the three user queries against an injected record store.
///
/// Holds no state of its own; every call that needs the record loads it
/// fresh from the store.
pub struct CredentialService {
    store: Arc<dyn UserRecordStore>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn UserRecordStore>) -> Self {
        Self { store }
    }

    /// Return the stored record verbatim.
    pub async fn fetch_record(&self) -> DomainResult<UserRecord> {
        self.load().await
    }

    /// Check a candidate username/password pair against the stored record.
    pub async fn validate_credentials(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> DomainResult<ValidationOutcome> {
        self.validate_fields(
            username.map(CandidateField::Text),
            password.map(CandidateField::Text),
        )
        .await
    }

    /// Check submitted login fields against the stored record.
    ///
    /// Order is fixed: presence check, load, username, then password. A
    /// mismatch is an `Ok` outcome, not an error.
    pub async fn validate_fields(
        &self,
        username: Option<CandidateField<'_>>,
        password: Option<CandidateField<'_>>,
    ) -> DomainResult<ValidationOutcome> {
        let (Some(username), Some(password)) = (present(username), present(password)) else {
            warn!("Login attempted without username or password");
            return Err(DomainError::MissingInput("username and password"));
        };

        let record = self.load().await?;

        let username = match username {
            CandidateField::Text(name) if name == record.username => name,
            CandidateField::Text(name) => {
                info!(username = %name, "Login rejected: unknown username");
                return Ok(ValidationOutcome::UsernameMismatch);
            }
            CandidateField::Other => {
                info!("Login rejected: non-string username");
                return Ok(ValidationOutcome::UsernameMismatch);
            }
        };

        let password_ok = match password {
            CandidateField::Text(candidate) => verify_password(candidate, &record.password),
            CandidateField::Other => false,
        };
        if !password_ok {
            info!(username = %username, "Login rejected: wrong password");
            return Ok(ValidationOutcome::PasswordMismatch);
        }

        info!(username = %username, "Login accepted");
        Ok(ValidationOutcome::Valid)
    }

    /// Build the logout confirmation markup for `username`.
    ///
    /// The username is HTML-escaped before it is embedded.
    pub fn format_logout_message(&self, username: Option<&str>) -> DomainResult<String> {
        let Some(username) = non_empty(username) else {
            return Err(DomainError::MissingInput("username"));
        };
        Ok(format!(
            "<b>{} successfully logged out.</b>",
            escape_html(username)
        ))
    }

    async fn load(&self) -> DomainResult<UserRecord> {
        self.store.load().await.map_err(|e| {
            error!("Failed to load user record: {}", e);
            DomainError::StorageUnavailable(e)
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn present(field: Option<CandidateField<'_>>) -> Option<CandidateField<'_>> {
    field.filter(|f| *f != CandidateField::Text(""))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
