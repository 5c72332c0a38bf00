use thiserror::Error;

/// Failure to produce the stored user record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed user record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No user record available")]
    Empty,
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field or parameter was absent or empty.
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

impl DomainError {
    /// Whether the caller is at fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::MissingInput(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for credential service operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_is_client_error() {
        assert!(DomainError::MissingInput("username").is_client_error());
        assert!(!DomainError::StorageUnavailable(StoreError::Empty).is_client_error());
    }

    #[test]
    fn malformed_json_converts_into_storage_unavailable() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DomainError = StoreError::from(parse_err).into();
        assert!(matches!(
            err,
            DomainError::StorageUnavailable(StoreError::Malformed(_))
        ));
    }
}
