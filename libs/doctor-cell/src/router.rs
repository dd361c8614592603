use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_doctor;

use crate::handlers;

/// Doctor profile and availability routes. Appointment-facing doctor
/// routes are mounted alongside these by the API router.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/list", get(handlers::list_doctors));

    let protected_routes = Router::new()
        .route("/changeAvailability", post(handlers::change_availability))
        .route("/profile", get(handlers::get_profile))
        .route("/updateProfile", post(handlers::update_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_doctor));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
