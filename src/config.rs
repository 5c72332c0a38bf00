//! Application configuration
//!
//! Loaded from a TOML file. Every section and field has a default, so a
//! partial (or empty) file is valid.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [storage]
//! user_file = "user.json"
//!
//! [http]
//! mount_path = "/user"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::shared::ConfigError;

/// Application directory name under the platform config dir.
const APP_DIR: &str = "user-profile-service";

/// Default configuration file location:
/// `{config_dir}/user-profile-service/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Directory relative storage paths are resolved against: the directory
/// holding the running executable, or the working directory as a fallback.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the user record. Relative paths are resolved
    /// against [`install_dir`].
    pub user_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            user_file: PathBuf::from("user.json"),
        }
    }
}

impl StorageConfig {
    pub fn resolved_user_file(&self) -> PathBuf {
        self.resolve_against(&install_dir())
    }

    pub fn resolve_against(&self, base: &Path) -> PathBuf {
        if self.user_file.is_absolute() {
            self.user_file.clone()
        } else {
            base.join(&self.user_file)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Prefix for `/profile`, `/login` and `/logout`. Empty mounts at root.
    pub mount_path: String,
    /// Serve Swagger UI at `/docs/`
    pub docs_enabled: bool,
    /// Allow any origin (CORS)
    pub cors_permissive: bool,
    /// Serve Prometheus metrics at `/metrics`
    pub metrics_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            mount_path: String::new(),
            docs_enabled: true,
            cors_permissive: true,
            metrics_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self)?;
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, raw).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.user_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.user_file must not be empty".into(),
            ));
        }
        let mount = &self.http.mount_path;
        if !mount.is_empty() && (!mount.starts_with('/') || mount.ends_with('/')) {
            return Err(ConfigError::Invalid(format!(
                "http.mount_path must start with '/' and not end with '/': {:?}",
                mount
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.address(), "0.0.0.0:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [http]
            mount_path = "/user"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.http.mount_path, "/user");
        assert!(config.http.docs_enabled);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn unknown_log_format_fails_to_parse() {
        let result = AppConfig::from_toml("[logging]\nformat = \"xml\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = AppConfig::default();
        config.http.mount_path = "user".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.http.mount_path = "/user/".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.user_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn port_zero_is_accepted_for_ephemeral_binding() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn relative_user_file_resolves_against_base() {
        let storage = StorageConfig::default();
        assert_eq!(
            storage.resolve_against(Path::new("/opt/app")),
            PathBuf::from("/opt/app/user.json")
        );

        let storage = StorageConfig {
            user_file: PathBuf::from("/etc/app/user.json"),
        };
        assert_eq!(
            storage.resolve_against(Path::new("/opt/app")),
            PathBuf::from("/etc/app/user.json")
        );
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.server.port = 4321;
        config.http.mount_path = "/api".into();
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
