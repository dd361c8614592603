use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::json;
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::{Role, TokenResponse};
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

// Token introspection reads whichever role header is present; user tokens
// take precedence, then admin, then doctor.
fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    for role in [Role::User, Role::Admin, Role::Doctor] {
        if let Some(value) = headers.get(role.header_name()) {
            return value
                .to_str()
                .map(str::to_string)
                .map_err(|_| AppError::Auth("Invalid token header".to_string()));
        }
    }
    Err(AppError::Auth("Not Authorized, Login Again".to_string()))
}

pub async fn validate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_token(&headers)?;

    match validate_token(&token, &state.config.jwt_secret) {
        Ok(principal) => Ok(Json(TokenResponse {
            valid: true,
            subject: principal.id,
            role: principal.role,
        })),
        Err(err) => Err(AppError::Auth(err)),
    }
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    debug!("Verifying token");

    let token = extract_token(&headers)?;

    match validate_token(&token, &state.config.jwt_secret) {
        Ok(_) => Ok(Json(json!({ "valid": true }))),
        Err(_) => Ok(Json(json!({ "valid": false }))),
    }
}
