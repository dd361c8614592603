use std::sync::Arc;

use chrono::Utc;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use auth_cell::services::password::hash_password;
use shared_database::store::StoreError;
use shared_database::AppState;

use crate::models::{
    CreateDoctorRequest, Doctor, DoctorError, SlotLedger, UpdateDoctorProfileRequest,
};

const MIN_PASSWORD_LENGTH: usize = 8;
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub struct DoctorService {
    state: Arc<AppState>,
    email_re: Regex,
}

impl DoctorService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            email_re: Regex::new(EMAIL_PATTERN).expect("email pattern is valid"),
        }
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        let doc = self
            .state
            .store
            .doctors
            .find(doctor_id)
            .await
            .ok_or(DoctorError::NotFound)?;

        serde_json::from_value(doc).map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    /// Create a doctor record (admin operation). The image has already been
    /// pushed to the CDN; only its URL is stored.
    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
        image_url: Option<String>,
    ) -> Result<Doctor, DoctorError> {
        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
            || request.speciality.trim().is_empty()
        {
            info!("Add doctor failed: missing details");
            return Err(DoctorError::MissingDetails);
        }

        if !self.email_re.is_match(&request.email) {
            info!("Add doctor failed: invalid email format - {}", request.email);
            return Err(DoctorError::InvalidEmail);
        }

        if request.password.len() < MIN_PASSWORD_LENGTH {
            info!("Add doctor failed: weak password for email - {}", request.email);
            return Err(DoctorError::WeakPassword);
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| DoctorError::Hashing(e.to_string()))?;

        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            password_hash,
            speciality: request.speciality,
            fees: request.fees,
            available: true,
            image: image_url.unwrap_or_default(),
            slots_booked: SlotLedger::new(),
            created_at: Utc::now(),
        };

        let doc = serde_json::to_value(&doctor)
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        match self
            .state
            .store
            .doctors
            .insert_unique(doctor.id, doc, "email")
            .await
        {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                info!("Add doctor failed: email already registered - {}", doctor.email);
                return Err(DoctorError::EmailExists);
            }
            Err(e) => return Err(DoctorError::DatabaseError(e.to_string())),
        }

        info!("Doctor {} added: {}", doctor.id, doctor.email);
        Ok(doctor)
    }

    /// Public doctor listing: password hashes never leave the store.
    pub async fn list_public(&self) -> Result<Vec<Value>, DoctorError> {
        let docs = self.state.store.doctors.find_all().await;

        let mut doctors = Vec::with_capacity(docs.len());
        for doc in docs {
            let doctor: Doctor = serde_json::from_value(doc)
                .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;
            doctors.push(doctor.sanitized());
        }
        Ok(doctors)
    }

    /// Toggle the availability flag, returning the new value.
    pub async fn change_availability(&self, doctor_id: Uuid) -> Result<bool, DoctorError> {
        debug!("Toggling availability for doctor {}", doctor_id);

        let updated = self
            .state
            .store
            .doctors
            .update(doctor_id, |doc| {
                let available = doc
                    .get("available")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                doc["available"] = Value::Bool(!available);
                Ok(())
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound => DoctorError::NotFound,
                other => DoctorError::DatabaseError(other.to_string()),
            })?;

        let available = updated
            .get("available")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        info!("Doctor {} availability changed to {}", doctor_id, available);
        Ok(available)
    }

    pub async fn get_profile(&self, doctor_id: Uuid) -> Result<Value, DoctorError> {
        Ok(self.get_doctor(doctor_id).await?.sanitized())
    }

    pub async fn update_profile(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorProfileRequest,
    ) -> Result<Value, DoctorError> {
        debug!("Updating profile for doctor {}", doctor_id);

        let updated = self
            .state
            .store
            .doctors
            .update(doctor_id, |doc| {
                if let Some(fees) = request.fees {
                    doc["fees"] = Value::from(fees);
                }
                if let Some(available) = request.available {
                    doc["available"] = Value::Bool(available);
                }
                Ok(())
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound => DoctorError::NotFound,
                other => DoctorError::DatabaseError(other.to_string()),
            })?;

        let doctor: Doctor = serde_json::from_value(updated)
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        info!("Profile updated for doctor {}", doctor_id);
        Ok(doctor.sanitized())
    }
}
