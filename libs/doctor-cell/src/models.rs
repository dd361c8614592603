use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared_models::error::AppError;

/// Record of already-booked slots per doctor: date string mapped to the
/// ordered sequence of booked time strings. Date and time strings are
/// opaque; a slot is one (date, time) pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotLedger(BTreeMap<String, Vec<String>>);

impl SlotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_booked(&self, date: &str, time: &str) -> bool {
        self.0
            .get(date)
            .map(|times| times.iter().any(|t| t == time))
            .unwrap_or(false)
    }

    /// Append the time to the date's sequence unless it is already present.
    /// Callers must run this inside the store's conditional update so the
    /// check and the append are one atomic step.
    pub fn reserve(&mut self, date: &str, time: &str) -> bool {
        if self.is_booked(date, time) {
            return false;
        }
        self.0.entry(date.to_string()).or_default().push(time.to_string());
        true
    }

    /// Remove the first matching entry; no-op if absent.
    pub fn release(&mut self, date: &str, time: &str) {
        if let Some(times) = self.0.get_mut(date) {
            if let Some(pos) = times.iter().position(|t| t == time) {
                times.remove(pos);
            }
            if times.is_empty() {
                self.0.remove(date);
            }
        }
    }

    pub fn booked_times(&self, date: &str) -> &[String] {
        self.0.get(date).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub speciality: String,
    pub fees: i64,
    pub available: bool,
    pub image: String,
    pub slots_booked: SlotLedger,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    /// Public representation: never exposes the password hash.
    pub fn sanitized(&self) -> Value {
        let mut doc = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Some(map) = doc.as_object_mut() {
            map.remove("password_hash");
        }
        doc
    }

    /// Snapshot embedded into appointments: no hash, no ledger.
    pub fn snapshot(&self) -> Value {
        let mut doc = self.sanitized();
        if let Some(map) = doc.as_object_mut() {
            map.remove("slots_booked");
        }
        doc
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub speciality: String,
    pub fees: i64,
    /// Optional base64-encoded profile image, uploaded to the CDN.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorProfileRequest {
    pub fees: Option<i64>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Missing Details")]
    MissingDetails,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Email already registered")]
    EmailExists,

    #[error("Password must be at least 8 characters")]
    WeakPassword,

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match &err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::MissingDetails
            | DoctorError::InvalidEmail
            | DoctorError::EmailExists
            | DoctorError::WeakPassword => AppError::ValidationError(err.to_string()),
            DoctorError::Hashing(msg) => AppError::Internal(msg.clone()),
            DoctorError::DatabaseError(msg) => AppError::Database(msg.clone()),
        }
    }
}
