use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::models::{Doctor, SlotLedger};
use shared_database::store::StoreError;
use shared_database::AppState;

use crate::models::{
    AdminDashboard, Appointment, AppointmentError, BookAppointmentRequest, DoctorDashboard,
};

const LATEST_APPOINTMENTS: usize = 5;

// Refusal markers for the booking conditional update.
const DOCTOR_UNAVAILABLE: &str = "doctor not available";
const SLOT_TAKEN: &str = "slot already booked";

pub struct BookingService {
    state: Arc<AppState>,
}

impl BookingService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Book a slot with a doctor. The reservation is one conditional update
    /// against the doctor document, so two concurrent requests for the same
    /// slot see exactly one success.
    pub async fn book(
        &self,
        user_id: Uuid,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for user {} with doctor {} on {} at {}",
            user_id, request.doc_id, request.slot_date, request.slot_time
        );

        if request.slot_date.trim().is_empty() || request.slot_time.trim().is_empty() {
            return Err(AppointmentError::MissingDetails);
        }

        let user_data = self.user_snapshot(user_id).await?;

        // Availability check and slot reserve run as one conditional update
        // under the doctors collection write lock, so neither an availability
        // toggle nor a competing booking can slip in between.
        let slot_date = request.slot_date.clone();
        let slot_time = request.slot_time.clone();
        let updated = self
            .state
            .store
            .doctors
            .update(request.doc_id, move |doc| {
                if doc.get("available").and_then(Value::as_bool) != Some(true) {
                    return Err(StoreError::Conflict(DOCTOR_UNAVAILABLE.to_string()));
                }

                let mut ledger: SlotLedger = serde_json::from_value(
                    doc.get("slots_booked").cloned().unwrap_or(Value::Null),
                )
                .unwrap_or_default();

                if !ledger.reserve(&slot_date, &slot_time) {
                    return Err(StoreError::Conflict(SLOT_TAKEN.to_string()));
                }

                doc["slots_booked"] = serde_json::to_value(&ledger)
                    .map_err(|e| StoreError::Conflict(e.to_string()))?;
                Ok(())
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppointmentError::DoctorNotFound,
                StoreError::Conflict(msg) if msg == DOCTOR_UNAVAILABLE => {
                    warn!("Doctor {} is not available", request.doc_id);
                    AppointmentError::DoctorNotAvailable
                }
                StoreError::Conflict(_) => {
                    warn!(
                        "Slot already booked for doctor {} on {} at {}",
                        request.doc_id, request.slot_date, request.slot_time
                    );
                    AppointmentError::SlotNotAvailable
                }
                other => AppointmentError::DatabaseError(other.to_string()),
            })?;

        let doctor: Doctor = serde_json::from_value(updated)
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id,
            doc_id: doctor.id,
            user_data,
            doc_data: doctor.snapshot(),
            amount: doctor.fees,
            slot_date: request.slot_date,
            slot_time: request.slot_time,
            date: Utc::now(),
            cancelled: false,
            is_completed: false,
        };

        let doc = serde_json::to_value(&appointment)
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;
        self.state.store.appointments.insert(appointment.id, doc).await;

        info!(
            "Appointment {} booked for user {} with doctor {}",
            appointment.id, user_id, doctor.id
        );
        Ok(appointment)
    }

    /// Cancel on behalf of the owning user.
    pub async fn cancel(
        &self,
        user_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        self.cancel_with_check(appointment_id, |appointment| {
            if appointment.user_id != user_id {
                warn!(
                    "Unauthorized cancellation attempt by user {} for appointment {}",
                    user_id, appointment_id
                );
                return Err(AppointmentError::Unauthorized);
            }
            Ok(())
        })
        .await
    }

    /// Cancel on behalf of the appointment's doctor.
    pub async fn cancel_for_doctor(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        self.cancel_with_check(appointment_id, |appointment| {
            if appointment.doc_id != doctor_id {
                warn!(
                    "Unauthorized cancellation attempt by doctor {} for appointment {}",
                    doctor_id, appointment_id
                );
                return Err(AppointmentError::Unauthorized);
            }
            Ok(())
        })
        .await
    }

    /// Admin cancellation: no ownership restriction.
    pub async fn cancel_any(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.cancel_with_check(appointment_id, |_| Ok(())).await
    }

    async fn cancel_with_check<F>(
        &self,
        appointment_id: Uuid,
        check: F,
    ) -> Result<Appointment, AppointmentError>
    where
        F: FnOnce(&Appointment) -> Result<(), AppointmentError>,
    {
        debug!("Cancelling appointment {}", appointment_id);

        let appointment = self.get_appointment(appointment_id).await?;
        check(&appointment)?;

        if appointment.cancelled {
            return Err(AppointmentError::AlreadyCancelled);
        }

        // The cancelled flag flips under the write lock; a concurrent
        // cancel loses and the slot is released once.
        let updated = self
            .state
            .store
            .appointments
            .update(appointment_id, |doc| {
                if doc.get("cancelled").and_then(Value::as_bool) == Some(true) {
                    return Err(StoreError::Conflict("already cancelled".to_string()));
                }
                doc["cancelled"] = Value::Bool(true);
                Ok(())
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppointmentError::NotFound,
                StoreError::Conflict(_) => AppointmentError::AlreadyCancelled,
                other => AppointmentError::DatabaseError(other.to_string()),
            })?;

        let appointment: Appointment = serde_json::from_value(updated)
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        self.release_slot(
            appointment.doc_id,
            &appointment.slot_date,
            &appointment.slot_time,
        )
        .await;

        info!("Appointment {} cancelled", appointment_id);
        Ok(appointment)
    }

    /// Mark an appointment completed (doctor operation).
    pub async fn complete(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Completing appointment {}", appointment_id);

        let appointment = self.get_appointment(appointment_id).await?;

        if appointment.doc_id != doctor_id {
            warn!(
                "Unauthorized completion attempt by doctor {} for appointment {}",
                doctor_id, appointment_id
            );
            return Err(AppointmentError::Unauthorized);
        }

        // The cancelled check rides inside the conditional update so a
        // cancel landing between the read and this write cannot leave the
        // record both cancelled and completed.
        let updated = self
            .state
            .store
            .appointments
            .update(appointment_id, |doc| {
                if doc.get("cancelled").and_then(Value::as_bool) == Some(true) {
                    return Err(StoreError::Conflict("already cancelled".to_string()));
                }
                doc["is_completed"] = Value::Bool(true);
                Ok(())
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppointmentError::NotFound,
                StoreError::Conflict(_) => AppointmentError::AlreadyCancelled,
                other => AppointmentError::DatabaseError(other.to_string()),
            })?;

        let appointment: Appointment = serde_json::from_value(updated)
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} completed by doctor {}", appointment_id, doctor_id);
        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        let doc = self
            .state
            .store
            .appointments
            .find(appointment_id)
            .await
            .ok_or(AppointmentError::NotFound)?;

        serde_json::from_value(doc).map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    /// All of the user's appointments, cancelled included.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Appointment>, AppointmentError> {
        self.list_where("user_id", user_id).await
    }

    pub async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.list_where("doc_id", doctor_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let docs = self.state.store.appointments.find_all().await;
        Self::parse_appointments(docs)
    }

    pub async fn doctor_dashboard(
        &self,
        doctor_id: Uuid,
    ) -> Result<DoctorDashboard, AppointmentError> {
        let mut appointments = self.list_for_doctor(doctor_id).await?;

        let earnings = appointments
            .iter()
            .filter(|a| a.is_completed && !a.cancelled)
            .map(|a| a.amount)
            .sum();
        let patients: HashSet<Uuid> = appointments.iter().map(|a| a.user_id).collect();

        appointments.sort_by(|a, b| b.date.cmp(&a.date));
        let total = appointments.len();
        appointments.truncate(LATEST_APPOINTMENTS);

        Ok(DoctorDashboard {
            earnings,
            appointments: total,
            patients: patients.len(),
            latest_appointments: appointments,
        })
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, AppointmentError> {
        let mut appointments = self.list_all().await?;

        appointments.sort_by(|a, b| b.date.cmp(&a.date));
        let total = appointments.len();
        appointments.truncate(LATEST_APPOINTMENTS);

        Ok(AdminDashboard {
            doctors: self.state.store.doctors.count().await,
            appointments: total,
            patients: self.state.store.users.count().await,
            latest_appointments: appointments,
        })
    }

    async fn user_snapshot(&self, user_id: Uuid) -> Result<Value, AppointmentError> {
        let mut doc = self
            .state
            .store
            .users
            .find(user_id)
            .await
            .ok_or(AppointmentError::UserNotFound)?;

        if let Some(map) = doc.as_object_mut() {
            map.remove("password_hash");
        }
        Ok(doc)
    }

    /// Remove one ledger entry for the slot; no-op if the doctor or the
    /// entry is gone.
    async fn release_slot(&self, doctor_id: Uuid, slot_date: &str, slot_time: &str) {
        let date = slot_date.to_string();
        let time = slot_time.to_string();

        let result = self
            .state
            .store
            .doctors
            .update(doctor_id, move |doc| {
                let mut ledger: SlotLedger = serde_json::from_value(
                    doc.get("slots_booked").cloned().unwrap_or(Value::Null),
                )
                .unwrap_or_default();

                ledger.release(&date, &time);

                doc["slots_booked"] = serde_json::to_value(&ledger)
                    .map_err(|e| StoreError::Conflict(e.to_string()))?;
                Ok(())
            })
            .await;

        if let Err(e) = result {
            warn!(
                "Could not release slot {} {} for doctor {}: {}",
                slot_date, slot_time, doctor_id, e
            );
        }
    }

    async fn list_where(
        &self,
        field: &str,
        id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let id_str = id.to_string();
        let docs = self
            .state
            .store
            .appointments
            .filter(|doc| doc.get(field).and_then(Value::as_str) == Some(id_str.as_str()))
            .await;

        Self::parse_appointments(docs)
    }

    fn parse_appointments(docs: Vec<Value>) -> Result<Vec<Appointment>, AppointmentError> {
        docs.into_iter()
            .map(|doc| {
                serde_json::from_value(doc)
                    .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
            })
            .collect()
    }
}
