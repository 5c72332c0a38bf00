//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ErrorResponse;
use super::modules::health::{self, ComponentHealth, HealthResponse, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::users::{self, LoginRequest, LoginResponse, UserHandlerState};
use crate::application::CredentialService;
use crate::config::HttpConfig;
use crate::domain::UserRecord;

/// Routes registered under the mount point.
const USER_PATHS: [&str; 3] = ["/profile", "/login", "/logout"];

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::get_profile,
        users::login,
        users::logout,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ComponentHealth,
            UserRecord,
            LoginRequest,
            LoginResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Users", description = "Stored user profile, credential check and logout message"),
    ),
    info(
        title = "User Profile Service API",
        version = "1.0.0",
        description = "Profile, login and logout endpoints backed by a single user record",
    )
)]
pub struct ApiDoc;

/// Knobs for [`create_api_router`]
#[derive(Clone, Default)]
pub struct ApiOptions {
    /// Prefix for the user routes; empty mounts them at the root
    pub mount_path: String,
    pub docs_enabled: bool,
    pub cors_permissive: bool,
    /// `/metrics` is only served when a handle is supplied
    pub metrics: Option<PrometheusHandle>,
}

impl ApiOptions {
    pub fn from_config(http: &HttpConfig, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            mount_path: http.mount_path.clone(),
            docs_enabled: http.docs_enabled,
            cors_permissive: http.cors_permissive,
            metrics: if http.metrics_enabled { metrics } else { None },
        }
    }
}

/// OpenAPI document with user routes prefixed by `mount_path`.
pub fn openapi_for(mount_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if !mount_path.is_empty() {
        for path in USER_PATHS {
            if let Some(item) = doc.paths.paths.remove(path) {
                doc.paths.paths.insert(format!("{}{}", mount_path, path), item);
            }
        }
    }
    doc
}

/// Create the API router with all routes
pub fn create_api_router(service: Arc<CredentialService>, options: ApiOptions) -> Router {
    let user_routes = Router::new()
        .route("/profile", get(users::get_profile))
        .route("/login", post(users::login))
        .route("/logout", get(users::logout))
        .with_state(UserHandlerState {
            service: service.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            service,
            started_at: Arc::new(Instant::now()),
        });

    let mut router = if options.mount_path.is_empty() {
        user_routes
    } else {
        Router::new().nest(&options.mount_path, user_routes)
    };
    router = router.merge(health_routes);

    if let Some(handle) = options.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    if options.docs_enabled {
        router = router.merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi_for(&options.mount_path)),
        );
    }

    router = router.layer(middleware::from_fn(http_metrics_middleware));

    if options.cors_permissive {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;

    use crate::infrastructure::storage::{InMemoryUserStore, JsonFileUserStore};

    fn admin_service() -> Arc<CredentialService> {
        Arc::new(CredentialService::new(Arc::new(InMemoryUserStore::new(
            UserRecord::new("admin", "secret"),
        ))))
    }

    async fn send(router: Router, req: Request<Body>) -> Response<Body> {
        use tower::Service;
        let mut svc = router.into_service();
        svc.call(req).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(resp: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn user_routes_mount_at_root_by_default() {
        let router = create_api_router(admin_service(), ApiOptions::default());
        let resp = send(router, get("/profile")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn user_routes_follow_mount_path() {
        let options = ApiOptions {
            mount_path: "/user".into(),
            ..Default::default()
        };

        let resp = send(
            create_api_router(admin_service(), options.clone()),
            get("/user/logout?username=alice"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(create_api_router(admin_service(), options), get("/profile")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn request_id_is_generated_or_echoed() {
        let resp = send(
            create_api_router(admin_service(), ApiOptions::default()),
            get("/profile"),
        )
        .await;
        let generated = resp.headers()["x-request-id"].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(generated).is_ok());

        let req = Request::builder()
            .uri("/profile")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = send(create_api_router(admin_service(), ApiOptions::default()), req).await;
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn health_is_ok_when_record_is_readable() {
        let resp = send(
            create_api_router(admin_service(), ApiOptions::default()),
            get("/health"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"]["status"], "ok");
    }

    #[tokio::test]
    async fn health_is_degraded_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileUserStore::new(dir.path().join("user.json"));
        let service = Arc::new(CredentialService::new(Arc::new(store)));

        let resp = send(
            create_api_router(service, ApiOptions::default()),
            get("/health"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(resp).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["storage"]["latency_ms"], Value::Null);
    }

    #[tokio::test]
    async fn metrics_route_requires_a_handle() {
        let resp = send(
            create_api_router(admin_service(), ApiOptions::default()),
            get("/metrics"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let handle = PrometheusBuilder::new().build_recorder().handle();
        let options = ApiOptions {
            metrics: Some(handle),
            ..Default::default()
        };
        let resp = send(create_api_router(admin_service(), options), get("/metrics")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_is_served_with_mounted_paths() {
        let options = ApiOptions {
            mount_path: "/user".into(),
            docs_enabled: true,
            ..Default::default()
        };
        let resp = send(
            create_api_router(admin_service(), options),
            get("/api-docs/openapi.json"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let doc = json_body(resp).await;
        assert!(doc["paths"].get("/user/login").is_some());
        assert!(doc["paths"].get("/login").is_none());
        assert!(doc["paths"].get("/health").is_some());
    }

    #[test]
    fn options_drop_metrics_when_disabled() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let mut http = HttpConfig::default();
        http.metrics_enabled = false;
        assert!(ApiOptions::from_config(&http, Some(handle)).metrics.is_none());
    }
}
