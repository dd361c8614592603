use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use appointment_cell::models::{AppointmentError, BookAppointmentRequest};
use appointment_cell::services::BookingService;
use doctor_cell::models::{Doctor, SlotLedger};
use shared_database::AppState;
use shared_utils::test_utils::TestConfig;

const DOCTOR_FEES: i64 = 50;

async fn seed_doctor(state: &Arc<AppState>, available: bool) -> Uuid {
    let doctor = Doctor {
        id: Uuid::new_v4(),
        name: "Dr. Richard James".to_string(),
        email: format!("{}@clinic.example", Uuid::new_v4()),
        password_hash: "unused-hash".to_string(),
        speciality: "General physician".to_string(),
        fees: DOCTOR_FEES,
        available,
        image: String::new(),
        slots_booked: SlotLedger::new(),
        created_at: Utc::now(),
    };
    let id = doctor.id;
    let doc = serde_json::to_value(&doctor).unwrap();
    state.store.doctors.insert(id, doc).await;
    id
}

async fn seed_user(state: &Arc<AppState>) -> Uuid {
    let id = Uuid::new_v4();
    let doc = json!({
        "id": id,
        "name": "Jane Doe",
        "email": format!("{}@example.com", id),
        "password_hash": "unused-hash",
        "phone": "000000000",
        "address": null,
        "dob": "Not Selected",
        "gender": "Not Selected",
        "image": "",
        "created_at": Utc::now(),
    });
    state.store.users.insert(id, doc).await;
    id
}

fn slot_request(doc_id: Uuid) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doc_id,
        slot_date: "25_08_2026".to_string(),
        slot_time: "10:30".to_string(),
    }
}

#[tokio::test]
async fn booking_reserves_the_slot_and_snapshots_both_parties() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    let appointment = service.book(user_id, slot_request(doctor_id)).await.unwrap();

    assert_eq!(appointment.user_id, user_id);
    assert_eq!(appointment.doc_id, doctor_id);
    assert_eq!(appointment.amount, DOCTOR_FEES);
    assert!(!appointment.cancelled);
    assert!(!appointment.is_completed);

    // Snapshots carry no credential material
    assert!(appointment.user_data.get("password_hash").is_none());
    assert!(appointment.doc_data.get("password_hash").is_none());
    assert!(appointment.doc_data.get("slots_booked").is_none());

    let doctor_doc = state.store.doctors.find(doctor_id).await.unwrap();
    let ledger: SlotLedger = serde_json::from_value(doctor_doc["slots_booked"].clone()).unwrap();
    assert!(ledger.is_booked("25_08_2026", "10:30"));
}

#[tokio::test]
async fn booking_a_taken_slot_fails() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let first_user = seed_user(&state).await;
    let second_user = seed_user(&state).await;

    service.book(first_user, slot_request(doctor_id)).await.unwrap();
    let result = service.book(second_user, slot_request(doctor_id)).await;

    assert_matches!(result, Err(AppointmentError::SlotNotAvailable));
    assert_eq!(state.store.appointments.count().await, 1);
}

#[tokio::test]
async fn concurrent_bookings_for_one_slot_admit_exactly_one() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let first_user = seed_user(&state).await;
    let second_user = seed_user(&state).await;

    let (first, second) = futures::join!(
        service.book(first_user, slot_request(doctor_id)),
        service.book(second_user, slot_request(doctor_id)),
    );

    let successes = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(successes, 1);

    let loser = if first.is_err() { first } else { second };
    assert_matches!(loser, Err(AppointmentError::SlotNotAvailable));

    assert_eq!(state.store.appointments.count().await, 1);
    let doctor_doc = state.store.doctors.find(doctor_id).await.unwrap();
    let ledger: SlotLedger = serde_json::from_value(doctor_doc["slots_booked"].clone()).unwrap();
    assert_eq!(ledger.booked_times("25_08_2026"), vec!["10:30"]);
}

#[tokio::test]
async fn unavailable_doctor_cannot_be_booked() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, false).await;
    let user_id = seed_user(&state).await;

    let result = service.book(user_id, slot_request(doctor_id)).await;

    assert_matches!(result, Err(AppointmentError::DoctorNotAvailable));

    // The refused reservation leaves the ledger untouched
    let doctor_doc = state.store.doctors.find(doctor_id).await.unwrap();
    let ledger: SlotLedger = serde_json::from_value(doctor_doc["slots_booked"].clone()).unwrap();
    assert!(!ledger.is_booked("25_08_2026", "10:30"));
}

#[tokio::test]
async fn booking_sees_an_availability_change_atomically() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    // Flip the flag the same way the doctor service does, then race a
    // booking against the already-committed toggle.
    state
        .store
        .doctors
        .update(doctor_id, |doc| {
            doc["available"] = serde_json::Value::Bool(false);
            Ok(())
        })
        .await
        .unwrap();

    let result = service.book(user_id, slot_request(doctor_id)).await;

    assert_matches!(result, Err(AppointmentError::DoctorNotAvailable));
    assert_eq!(state.store.appointments.count().await, 0);
}

#[tokio::test]
async fn booking_with_unknown_doctor_fails() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let user_id = seed_user(&state).await;

    let result = service.book(user_id, slot_request(Uuid::new_v4())).await;

    assert_matches!(result, Err(AppointmentError::DoctorNotFound));
}

#[tokio::test]
async fn booking_with_unknown_user_fails() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;

    let result = service.book(Uuid::new_v4(), slot_request(doctor_id)).await;

    assert_matches!(result, Err(AppointmentError::UserNotFound));
}

#[tokio::test]
async fn booking_without_slot_details_fails() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    let result = service
        .book(
            user_id,
            BookAppointmentRequest {
                doc_id: doctor_id,
                slot_date: String::new(),
                slot_time: "10:30".to_string(),
            },
        )
        .await;

    assert_matches!(result, Err(AppointmentError::MissingDetails));
}

#[tokio::test]
async fn cancelling_makes_the_slot_bookable_again() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let first_user = seed_user(&state).await;
    let second_user = seed_user(&state).await;

    let appointment = service.book(first_user, slot_request(doctor_id)).await.unwrap();
    service.cancel(first_user, appointment.id).await.unwrap();

    let doctor_doc = state.store.doctors.find(doctor_id).await.unwrap();
    let ledger: SlotLedger = serde_json::from_value(doctor_doc["slots_booked"].clone()).unwrap();
    assert!(!ledger.is_booked("25_08_2026", "10:30"));

    let rebooked = service.book(second_user, slot_request(doctor_id)).await;
    assert!(rebooked.is_ok());
}

#[tokio::test]
async fn user_cannot_cancel_anothers_appointment() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let owner = seed_user(&state).await;
    let intruder = seed_user(&state).await;

    let appointment = service.book(owner, slot_request(doctor_id)).await.unwrap();
    let result = service.cancel(intruder, appointment.id).await;

    assert_matches!(result, Err(AppointmentError::Unauthorized));

    // The reservation stays intact
    let doctor_doc = state.store.doctors.find(doctor_id).await.unwrap();
    let ledger: SlotLedger = serde_json::from_value(doctor_doc["slots_booked"].clone()).unwrap();
    assert!(ledger.is_booked("25_08_2026", "10:30"));
}

#[tokio::test]
async fn double_cancel_is_rejected() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    let appointment = service.book(user_id, slot_request(doctor_id)).await.unwrap();
    service.cancel(user_id, appointment.id).await.unwrap();

    let result = service.cancel(user_id, appointment.id).await;

    assert_matches!(result, Err(AppointmentError::AlreadyCancelled));
}

#[tokio::test]
async fn cancelled_appointments_stay_in_the_users_history() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    let appointment = service.book(user_id, slot_request(doctor_id)).await.unwrap();
    service.cancel(user_id, appointment.id).await.unwrap();

    let history = service.list_for_user(user_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].cancelled);
}

#[tokio::test]
async fn doctor_can_only_cancel_own_appointments() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let other_doctor = seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    let appointment = service.book(user_id, slot_request(doctor_id)).await.unwrap();

    let result = service.cancel_for_doctor(other_doctor, appointment.id).await;
    assert_matches!(result, Err(AppointmentError::Unauthorized));

    let cancelled = service.cancel_for_doctor(doctor_id, appointment.id).await.unwrap();
    assert!(cancelled.cancelled);
}

#[tokio::test]
async fn admin_can_cancel_any_appointment() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    let appointment = service.book(user_id, slot_request(doctor_id)).await.unwrap();
    let cancelled = service.cancel_any(appointment.id).await.unwrap();

    assert!(cancelled.cancelled);
}

#[tokio::test]
async fn completion_is_restricted_to_the_appointments_doctor() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let other_doctor = seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    let appointment = service.book(user_id, slot_request(doctor_id)).await.unwrap();

    let result = service.complete(other_doctor, appointment.id).await;
    assert_matches!(result, Err(AppointmentError::Unauthorized));

    let completed = service.complete(doctor_id, appointment.id).await.unwrap();
    assert!(completed.is_completed);
}

#[tokio::test]
async fn cancelled_appointment_cannot_be_completed() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    let appointment = service.book(user_id, slot_request(doctor_id)).await.unwrap();
    service.cancel(user_id, appointment.id).await.unwrap();

    let result = service.complete(doctor_id, appointment.id).await;

    assert_matches!(result, Err(AppointmentError::AlreadyCancelled));

    // The record never ends up both cancelled and completed
    let stored = state.store.appointments.find(appointment.id).await.unwrap();
    assert_eq!(stored["cancelled"], true);
    assert_eq!(stored["is_completed"], false);
}

#[tokio::test]
async fn doctor_dashboard_counts_completed_earnings_only() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    let first_user = seed_user(&state).await;
    let second_user = seed_user(&state).await;

    let completed = service.book(first_user, slot_request(doctor_id)).await.unwrap();
    service
        .book(
            second_user,
            BookAppointmentRequest {
                doc_id: doctor_id,
                slot_date: "26_08_2026".to_string(),
                slot_time: "11:00".to_string(),
            },
        )
        .await
        .unwrap();
    service.complete(doctor_id, completed.id).await.unwrap();

    let dashboard = service.doctor_dashboard(doctor_id).await.unwrap();

    assert_eq!(dashboard.earnings, DOCTOR_FEES);
    assert_eq!(dashboard.appointments, 2);
    assert_eq!(dashboard.patients, 2);
    assert_eq!(dashboard.latest_appointments.len(), 2);
}

#[tokio::test]
async fn admin_dashboard_reflects_store_counts() {
    let state = TestConfig::default().to_state();
    let service = BookingService::new(state.clone());
    let doctor_id = seed_doctor(&state, true).await;
    seed_doctor(&state, true).await;
    let user_id = seed_user(&state).await;

    service.book(user_id, slot_request(doctor_id)).await.unwrap();

    let dashboard = service.admin_dashboard().await.unwrap();

    assert_eq!(dashboard.doctors, 2);
    assert_eq!(dashboard.patients, 1);
    assert_eq!(dashboard.appointments, 1);
    assert_eq!(dashboard.latest_appointments.len(), 1);
}
