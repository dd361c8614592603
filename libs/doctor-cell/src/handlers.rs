use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use auth_cell::models::LoginRequest;
use auth_cell::services::CredentialService;
use shared_database::AppState;
use shared_models::auth::{Principal, Role};
use shared_models::error::AppError;

use crate::models::UpdateDoctorProfileRequest;
use crate::services::DoctorService;

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = CredentialService::new(state);

    let token = service.login(request, Role::Doctor).await?;

    Ok(Json(json!({ "success": true, "token": token })))
}

pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(state);

    let doctors = service.list_public().await?;

    Ok(Json(json!({ "success": true, "doctors": doctors })))
}

pub async fn change_availability(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    debug!("Doctor {} toggling availability", principal.id);
    let service = DoctorService::new(state);

    service.change_availability(principal.id).await?;

    Ok(Json(json!({ "success": true, "message": "Availability Changed" })))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(state);

    let profile = service.get_profile(principal.id).await?;

    Ok(Json(json!({ "success": true, "profileData": profile })))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<UpdateDoctorProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(state);

    service.update_profile(principal.id, request).await?;

    Ok(Json(json!({ "success": true, "message": "Profile Updated" })))
}
