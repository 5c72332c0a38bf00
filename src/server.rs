//! Reusable server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! store and service wiring, metrics, the REST API and graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::CredentialService;
use crate::config::{AppConfig, LogFormat};
use crate::domain::UserRecordStore;
use crate::infrastructure::storage::JsonFileUserStore;
use crate::interfaces::http::modules::metrics::describe_metrics;
use crate::interfaces::http::{create_api_router, ApiOptions};
use crate::shared::shutdown::ShutdownCoordinator;

/// Initialise the global tracing subscriber from the logging config.
///
/// `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if let Err(e) = result {
        eprintln!("Tracing subscriber already initialised: {}", e);
    }
}

/// The global metrics recorder can only be installed once per process;
/// restarts within the same process reuse it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                describe_metrics();
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Metrics disabled, failed to install recorder: {}", e);
                None
            }
        })
        .clone()
}

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the service.
#[derive(Default)]
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Store override; defaults to the JSON file from `config.storage`.
    pub store: Option<Arc<dyn UserRecordStore>>,
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running service.
pub struct ServerHandle {
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to.
    pub local_addr: SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Build the store, service and router, bind the listener and start
    /// serving in a background task.
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting user profile service...");

        let store = match opts.store {
            Some(store) => store,
            None => {
                let store = JsonFileUserStore::new(app_cfg.storage.resolved_user_file());
                info!("User record file: {}", store.path().display());
                if !store.path().exists() {
                    warn!(
                        "User record file {} does not exist; /profile and /login will fail until it is created",
                        store.path().display()
                    );
                }
                Arc::new(store)
            }
        };
        let service = Arc::new(CredentialService::new(store));

        let metrics = if app_cfg.http.metrics_enabled {
            prometheus_handle()
        } else {
            None
        };
        let router = create_api_router(service, ApiOptions::from_config(&app_cfg.http, metrics));

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        if app_cfg.http.docs_enabled {
            info!("Swagger UI available at http://{}/docs/", local_addr);
        }

        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            config: app_cfg,
            local_addr,
            shutdown,
            api_task,
        })
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for shutdown to be triggered, then for in-flight requests to
    /// drain, bounded by `server.shutdown_timeout`.
    pub async fn wait(self) {
        let api_task = self.api_task;
        let abort = api_task.abort_handle();

        let drained = self
            .shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
            })
            .await;

        if !drained {
            abort.abort();
        }
        info!("User profile service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down user profile service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRecord;
    use crate::infrastructure::storage::InMemoryUserStore;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.http.metrics_enabled = false;
        config.http.docs_enabled = false;
        config
    }

    #[tokio::test]
    async fn rejects_invalid_config() {
        let mut config = test_config();
        config.http.mount_path = "no-slash".into();
        let result = ServerHandle::start(ServerOptions {
            config,
            store: None,
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn serves_requests_until_shutdown() {
        let store = Arc::new(InMemoryUserStore::new(UserRecord::new("admin", "secret")));

        let handle = ServerHandle::start(ServerOptions {
            config: test_config(),
            store: Some(store),
        })
        .await
        .unwrap();
        assert!(handle.is_running());
        assert_ne!(handle.local_addr.port(), 0);

        let mut stream = tokio::net::TcpStream::connect(handle.local_addr).await.unwrap();
        stream
            .write_all(b"GET /logout?username=alice HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("<b>alice successfully logged out.</b>"));

        tokio::time::timeout(std::time::Duration::from_secs(5), handle.shutdown())
            .await
            .expect("shutdown should complete");
    }
}
