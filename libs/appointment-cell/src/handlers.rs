use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::auth::Principal;
use shared_models::error::AppError;

use crate::models::{
    BookAppointmentRequest, CancelAppointmentRequest, CompleteAppointmentRequest,
};
use crate::services::BookingService;

// ---- user-facing ----

pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = BookingService::new(state);

    service.book(principal.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Appointment Booked" })),
    ))
}

pub async fn list_user_appointments(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);

    let appointments = service.list_for_user(principal.id).await?;

    Ok(Json(json!({ "success": true, "appointments": appointments })))
}

pub async fn cancel_user_appointment(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);

    service.cancel(principal.id, request.appointment_id).await?;

    Ok(Json(json!({ "success": true, "message": "Appointment Cancelled" })))
}

// ---- doctor-facing ----

pub async fn list_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);

    let appointments = service.list_for_doctor(principal.id).await?;

    Ok(Json(json!({ "success": true, "appointments": appointments })))
}

pub async fn cancel_doctor_appointment(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);

    service
        .cancel_for_doctor(principal.id, request.appointment_id)
        .await?;

    Ok(Json(json!({ "success": true, "message": "Appointment Cancelled" })))
}

pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CompleteAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);

    service
        .complete(principal.id, request.appointment_id)
        .await?;

    Ok(Json(json!({ "success": true, "message": "Appointment Completed" })))
}

pub async fn doctor_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);

    let dashboard = service.doctor_dashboard(principal.id).await?;

    Ok(Json(json!({ "success": true, "dashData": dashboard })))
}

// ---- admin-facing ----

pub async fn list_all_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);

    let appointments = service.list_all().await?;

    Ok(Json(json!({ "success": true, "appointments": appointments })))
}

pub async fn cancel_any_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);

    service.cancel_any(request.appointment_id).await?;

    Ok(Json(json!({ "success": true, "message": "Appointment Cancelled" })))
}

pub async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);

    let dashboard = service.admin_dashboard().await?;

    Ok(Json(json!({ "success": true, "dashData": dashboard })))
}
