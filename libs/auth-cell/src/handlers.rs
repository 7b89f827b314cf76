use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_models::auth::{LoginRequest, LoginResponse, TokenStatus};
use shared_models::error::AppError;
use shared_utils::jwt::{issue_staff_token, validate_token};

const STAFF_TOKEN_TTL_HOURS: i64 = 12;

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

/// PIN gate for the staff panel. A correct PIN buys a signed short-lived
/// token; there is no server-side session to clear on logout.
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let pin = request.pin.trim();

    if pin.is_empty() || pin != config.admin_pin {
        warn!("Rejected staff login attempt");
        return Err(AppError::Auth("Incorrect PIN".to_string()));
    }

    let (token, expires_at) = issue_staff_token(&config.session_secret, STAFF_TOKEN_TTL_HOURS)
        .map_err(AppError::Internal)?;

    info!("Staff login accepted, token valid until {}", expires_at);

    Ok(Json(LoginResponse { token, expires_at }))
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenStatus>, AppError> {
    let token = extract_bearer_token(&headers)?;

    match validate_token(&token, &config.session_secret) {
        Ok(_) => Ok(Json(TokenStatus { valid: true })),
        Err(_) => Ok(Json(TokenStatus { valid: false })),
    }
}
