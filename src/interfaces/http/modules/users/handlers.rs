//! User API handlers

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::dto::{LoginRequest, LoginResponse, LogoutParams};
use crate::application::CredentialService;
use crate::domain::{DomainError, UserRecord};
use crate::interfaces::http::common::ErrorResponse;

/// Users state
#[derive(Clone)]
pub struct UserHandlerState {
    pub service: Arc<CredentialService>,
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Users",
    responses(
        (status = 200, description = "The stored user record", body = UserRecord),
        (status = 500, description = "User record could not be read", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<UserHandlerState>,
) -> Result<Json<UserRecord>, (StatusCode, Json<ErrorResponse>)> {
    state.service.fetch_record().await.map(Json).map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to read user data")),
        )
    })
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Validation outcome; `status` is false on mismatch", body = LoginResponse),
        (status = 400, description = "Username or password missing", body = LoginResponse),
        (status = 500, description = "User record could not be read", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<UserHandlerState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    // An unparseable body carries no usable credentials.
    let request = body.map(|Json(req)| req).unwrap_or_else(|rejection| {
        debug!("Rejected login body: {}", rejection);
        LoginRequest::default()
    });

    let result = state
        .service
        .validate_fields(request.username(), request.password())
        .await;

    match result {
        Ok(outcome) => {
            metrics::counter!("login_attempts_total", "outcome" => outcome.as_str()).increment(1);
            Json(LoginResponse::from(outcome)).into_response()
        }
        Err(DomainError::MissingInput(_)) => {
            metrics::counter!("login_attempts_total", "outcome" => "missing_input").increment(1);
            (StatusCode::BAD_REQUEST, Json(LoginResponse::missing_input())).into_response()
        }
        Err(DomainError::StorageUnavailable(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Server error during login")),
        )
            .into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/logout",
    tag = "Users",
    params(LogoutParams),
    responses(
        (status = 200, description = "Logout confirmation markup", body = String, content_type = "text/html"),
        (status = 400, description = "Username parameter missing", body = String, content_type = "text/html")
    )
)]
pub async fn logout(
    State(state): State<UserHandlerState>,
    params: Result<Query<LogoutParams>, QueryRejection>,
) -> (StatusCode, Html<String>) {
    let username = params.ok().and_then(|Query(p)| p.username);

    match state.service.format_logout_message(username.as_deref()) {
        Ok(markup) => (StatusCode::OK, Html(markup)),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Html("<b>Username parameter is required</b>".to_string()),
        ),
    }
}
