use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// The single stored credential pair.
///
/// `password` is either plaintext or a bcrypt hash. Fields other than
/// `username` and `password` present in the backing file are kept in
/// `extra` so the record serializes back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            extra: Map::new(),
        }
    }
}
