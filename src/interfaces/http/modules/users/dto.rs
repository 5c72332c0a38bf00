//! User route DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::application::{CandidateField, ValidationOutcome};

/// Message returned when either login field is absent or empty.
pub const MISSING_CREDENTIALS: &str = "Username and password are required";

/// Login body. Fields are kept as raw JSON so non-string values reach the
/// credential check instead of failing extraction.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(value_type = Option<String>)]
    pub username: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub password: Option<Value>,
}

impl LoginRequest {
    pub fn username(&self) -> Option<CandidateField<'_>> {
        candidate(self.username.as_ref())
    }

    pub fn password(&self) -> Option<CandidateField<'_>> {
        candidate(self.password.as_ref())
    }
}

/// Falsy JSON values (`null`, `false`, `0`, `""`) count as absent.
fn candidate(value: Option<&Value>) -> Option<CandidateField<'_>> {
    match value? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(CandidateField::Text(s)),
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        _ => Some(CandidateField::Other),
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub status: bool,
    pub message: String,
}

impl LoginResponse {
    pub fn missing_input() -> Self {
        Self {
            status: false,
            message: MISSING_CREDENTIALS.to_string(),
        }
    }
}

impl From<ValidationOutcome> for LoginResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        Self {
            status: outcome.status(),
            message: outcome.message().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogoutParams {
    /// Name of the user logging out
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> LoginRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn string_fields_are_text() {
        let req = request(json!({"username": "admin", "password": "secret"}));
        assert_eq!(req.username(), Some(CandidateField::Text("admin")));
        assert_eq!(req.password(), Some(CandidateField::Text("secret")));
    }

    #[test]
    fn falsy_values_are_absent() {
        for value in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            let req = request(json!({"username": value}));
            assert_eq!(req.username(), None, "{value}");
        }
        assert_eq!(request(json!({})).password(), None);
    }

    #[test]
    fn truthy_non_strings_are_other() {
        for value in [json!(42), json!(true), json!([]), json!({})] {
            let req = request(json!({"password": value}));
            assert_eq!(req.password(), Some(CandidateField::Other), "{value}");
        }
    }
}
