//! Response bodies shared across modules

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON body for server-side failures: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
