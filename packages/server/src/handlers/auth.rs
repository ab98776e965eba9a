use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminToken;
use crate::extractors::json::AppJson;
use crate::models::auth::{LoginRequest, LoginResponse, MeResponse};
use crate::state::AppState;
use crate::utils::jwt;

/// Emergency password honored when no admin password is configured.
const FALLBACK_ADMIN_PASSWORD: &str = "admin123";

/// Handle admin login.
///
/// A single plaintext comparison against the configured secret; hardening
/// is out of scope here. The issued token is what gates the admin surface.
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    tag = "Auth",
    operation_id = "adminLogin",
    summary = "Log in to the admin surface",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Wrong password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let expected = state
        .config
        .auth
        .admin_password
        .as_deref()
        .unwrap_or(FALLBACK_ADMIN_PASSWORD);

    if payload.password != expected {
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt::sign(&state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse { token }))
}

/// Confirm the caller's token is valid.
#[utoipa::path(
    get,
    path = "/api/v1/admin/me",
    tag = "Auth",
    operation_id = "adminMe",
    summary = "Check admin token validity",
    responses(
        (status = 200, description = "Token is valid", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(admin))]
pub async fn me(admin: AdminToken) -> Json<MeResponse> {
    Json(MeResponse {
        subject: admin.subject,
    })
}
