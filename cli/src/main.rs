//! User profile service — CLI server
//!
//! ```sh
//! # Run with default config (~/.config/user-profile-service/config.toml)
//! user-profile-service
//!
//! # Custom config path and user file
//! user-profile-service --config /etc/user-profile/config.toml --user-file /srv/user.json
//!
//! # Validate config and user file without starting
//! user-profile-service --check
//!
//! # Produce a bcrypt hash to store instead of a plaintext password
//! user-profile-service --hash-password 's3cret'
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use user_profile::config::AppConfig;
use user_profile::infrastructure::crypto::password::hash_password;
use user_profile::server::{init_tracing, ServerHandle, ServerOptions};
use user_profile::{JsonFileUserStore, UserRecordStore};

/// Serves /profile, /login and /logout from a single JSON user record.
#[derive(Parser, Debug)]
#[command(
    name = "user-profile-service",
    version,
    about = "Profile, login and logout endpoints backed by one user record",
    long_about = "HTTP service exposing /profile, /login and /logout, backed by a \
                  single JSON user record file.\n\n\
                  Default config: ~/.config/user-profile-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "USER_PROFILE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the user record file.
    #[arg(long)]
    user_file: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and user record file, then exit.
    #[arg(long)]
    check: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    init_config: bool,

    /// Print a bcrypt hash of the given password and exit.
    #[arg(long, value_name = "PLAIN")]
    hash_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(ref plain) = cli.hash_password {
        println!("{}", hash_password(plain)?);
        return Ok(());
    }

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(user_profile::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(user_file) = cli.user_file {
        config.storage.user_file = user_file;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    if cli.init_config {
        config.save(&config_path)?;
        println!("Configuration written to {}", config_path.display());
        return Ok(());
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        let user_file = config.storage.resolved_user_file();
        let record = JsonFileUserStore::new(&user_file).load().await?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   User file   : {}", user_file.display());
        println!("   Username    : {}", record.username);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        store: None,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;

    Ok(())
}
