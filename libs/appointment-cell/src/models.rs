use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doc_id: Uuid,
    /// Sanitized snapshots of the user and doctor at booking time.
    pub user_data: Value,
    pub doc_data: Value,
    /// Doctor fees at booking time.
    pub amount: i64,
    pub slot_date: String,
    pub slot_time: String,
    pub date: DateTime<Utc>,
    pub cancelled: bool,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doc_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub appointment_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteAppointmentRequest {
    pub appointment_id: Uuid,
}

/// Dashboard aggregates for the doctor and admin panels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDashboard {
    pub earnings: i64,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub doctors: usize,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("User does not exist")]
    UserNotFound,

    #[error("Doctor Not Available")]
    DoctorNotAvailable,

    #[error("Slot Not Available")]
    SlotNotAvailable,

    #[error("Missing Details")]
    MissingDetails,

    #[error("Unauthorized action")]
    Unauthorized,

    #[error("Appointment already cancelled")]
    AlreadyCancelled,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match &err {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::UserNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::DoctorNotAvailable
            | AppointmentError::SlotNotAvailable
            | AppointmentError::MissingDetails
            | AppointmentError::AlreadyCancelled => AppError::BadRequest(err.to_string()),
            AppointmentError::Unauthorized => AppError::Auth(err.to_string()),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg.clone()),
        }
    }
}
