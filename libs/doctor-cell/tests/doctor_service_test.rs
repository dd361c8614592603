use assert_matches::assert_matches;

use auth_cell::models::LoginRequest;
use auth_cell::services::CredentialService;
use doctor_cell::models::{CreateDoctorRequest, DoctorError, UpdateDoctorProfileRequest};
use doctor_cell::services::DoctorService;
use shared_models::auth::Role;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::TestConfig;

fn create_request(email: &str) -> CreateDoctorRequest {
    CreateDoctorRequest {
        name: "Dr. Richard James".to_string(),
        email: email.to_string(),
        password: "doctor-password-1".to_string(),
        speciality: "General physician".to_string(),
        fees: 50,
        image: None,
    }
}

#[tokio::test]
async fn new_doctor_starts_available_with_an_empty_ledger() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(state.clone());

    let doctor = service
        .create_doctor(create_request("richard@clinic.example"), None)
        .await
        .unwrap();

    assert!(doctor.available);
    assert!(doctor.password_hash.starts_with("$argon2"));

    let stored = state.store.doctors.find(doctor.id).await.unwrap();
    assert_eq!(stored["slots_booked"], serde_json::json!({}));
}

#[tokio::test]
async fn create_doctor_rejects_duplicate_email() {
    let service = DoctorService::new(TestConfig::default().to_state());

    service
        .create_doctor(create_request("richard@clinic.example"), None)
        .await
        .unwrap();

    let result = service
        .create_doctor(create_request("richard@clinic.example"), None)
        .await;

    assert_matches!(result, Err(DoctorError::EmailExists));
}

#[tokio::test]
async fn create_doctor_rejects_short_password() {
    let service = DoctorService::new(TestConfig::default().to_state());

    let result = service
        .create_doctor(
            CreateDoctorRequest {
                password: "short".to_string(),
                ..create_request("richard@clinic.example")
            },
            None,
        )
        .await;

    assert_matches!(result, Err(DoctorError::WeakPassword));
}

#[tokio::test]
async fn create_doctor_rejects_missing_speciality() {
    let service = DoctorService::new(TestConfig::default().to_state());

    let result = service
        .create_doctor(
            CreateDoctorRequest {
                speciality: "  ".to_string(),
                ..create_request("richard@clinic.example")
            },
            None,
        )
        .await;

    assert_matches!(result, Err(DoctorError::MissingDetails));
}

#[tokio::test]
async fn created_doctor_can_login_with_a_doctor_token() {
    let config = TestConfig::default();
    let state = config.to_state();
    let doctor = DoctorService::new(state.clone())
        .create_doctor(create_request("richard@clinic.example"), None)
        .await
        .unwrap();

    let token = CredentialService::new(state)
        .login(
            LoginRequest {
                email: "richard@clinic.example".to_string(),
                password: "doctor-password-1".to_string(),
            },
            Role::Doctor,
        )
        .await
        .unwrap();

    let principal = validate_token(&token, &config.jwt_secret).unwrap();
    assert_eq!(principal.id, doctor.id);
    assert_eq!(principal.role, Role::Doctor);
}

#[tokio::test]
async fn public_listing_never_exposes_password_hashes() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(state.clone());

    service
        .create_doctor(create_request("richard@clinic.example"), None)
        .await
        .unwrap();
    service
        .create_doctor(create_request("emily@clinic.example"), None)
        .await
        .unwrap();

    let doctors = service.list_public().await.unwrap();

    assert_eq!(doctors.len(), 2);
    for doctor in &doctors {
        assert!(doctor.get("password_hash").is_none());
        assert!(doctor.get("slots_booked").is_some());
    }
}

#[tokio::test]
async fn availability_toggles_on_each_call() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(state.clone());
    let doctor = service
        .create_doctor(create_request("richard@clinic.example"), None)
        .await
        .unwrap();

    assert!(!service.change_availability(doctor.id).await.unwrap());
    assert!(service.change_availability(doctor.id).await.unwrap());
}

#[tokio::test]
async fn profile_update_changes_fees_and_availability() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(state.clone());
    let doctor = service
        .create_doctor(create_request("richard@clinic.example"), None)
        .await
        .unwrap();

    let profile = service
        .update_profile(
            doctor.id,
            UpdateDoctorProfileRequest {
                fees: Some(75),
                available: Some(false),
            },
        )
        .await
        .unwrap();

    assert_eq!(profile["fees"], 75);
    assert_eq!(profile["available"], false);
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn partial_profile_update_keeps_the_other_field() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(state.clone());
    let doctor = service
        .create_doctor(create_request("richard@clinic.example"), None)
        .await
        .unwrap();

    let profile = service
        .update_profile(
            doctor.id,
            UpdateDoctorProfileRequest {
                fees: Some(75),
                available: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(profile["fees"], 75);
    assert_eq!(profile["available"], true);
}
