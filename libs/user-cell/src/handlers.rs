use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use auth_cell::models::{LoginRequest, RegisterRequest};
use auth_cell::services::CredentialService;
use shared_database::AppState;
use shared_models::auth::{Principal, Role};
use shared_models::error::AppError;

use crate::models::UpdateProfileRequest;
use crate::services::ProfileService;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = CredentialService::new(state);

    let token = service.register_user(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": token,
            "message": "User registered successfully"
        })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = CredentialService::new(state);

    let token = service.login(request, Role::User).await?;

    Ok(Json(json!({ "success": true, "token": token })))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(state);

    let user_data = service.get_profile(principal.id).await?;

    Ok(Json(json!({ "success": true, "userData": user_data })))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(state);

    service.update_profile(principal.id, request).await?;

    Ok(Json(json!({ "success": true, "message": "Profile Updated" })))
}
