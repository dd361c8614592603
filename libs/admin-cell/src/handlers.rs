use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use auth_cell::models::LoginRequest;
use auth_cell::services::CredentialService;
use doctor_cell::models::CreateDoctorRequest;
use doctor_cell::services::DoctorService;
use shared_database::AppState;
use shared_models::auth::{Principal, Role};
use shared_models::error::AppError;

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = CredentialService::new(state);

    let token = service.login(request, Role::Admin).await?;

    Ok(Json(json!({ "success": true, "token": token })))
}

pub async fn add_doctor(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(mut request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    info!("Admin {} adding doctor {}", principal.id, request.email);

    let image_url = match request.image.take() {
        Some(image_base64) => Some(
            state
                .media
                .upload_image(principal.id, &image_base64)
                .await
                .map_err(|e| AppError::ExternalService(e.to_string()))?,
        ),
        None => None,
    };

    let service = DoctorService::new(state);
    service.create_doctor(request, image_url).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Doctor Added" })),
    ))
}

pub async fn all_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(state);

    let doctors = service.list_public().await?;

    Ok(Json(json!({ "success": true, "doctors": doctors })))
}
