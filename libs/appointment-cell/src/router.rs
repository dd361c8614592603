use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{auth_admin, auth_doctor, auth_user};

use crate::handlers;

/// Appointment routes mounted under /api/user alongside the profile routes.
pub fn user_appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/bookAppointment", post(handlers::book_appointment))
        .route("/appointments", get(handlers::list_user_appointments))
        .route("/cancelAppointment", post(handlers::cancel_user_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_user))
        .with_state(state)
}

/// Appointment routes mounted under /api/doctor.
pub fn doctor_appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/appointments", get(handlers::list_doctor_appointments))
        .route("/cancelAppointment", post(handlers::cancel_doctor_appointment))
        .route("/completeAppointment", post(handlers::complete_appointment))
        .route("/dashboard", get(handlers::doctor_dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_doctor))
        .with_state(state)
}

/// Appointment routes mounted under /api/admin.
pub fn admin_appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/allAppointments", get(handlers::list_all_appointments))
        .route("/cancelAppointment", post(handlers::cancel_any_appointment))
        .route("/dashboard", get(handlers::admin_dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_admin))
        .with_state(state)
}
