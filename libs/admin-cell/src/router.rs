use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_admin;

use crate::handlers;

/// Admin login and doctor management. Appointment-facing admin routes are
/// mounted alongside these by the API router.
pub fn admin_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/login", post(handlers::login));

    let protected_routes = Router::new()
        .route("/addDoctor", post(handlers::add_doctor))
        .route("/allDoctors", get(handlers::all_doctors))
        .layer(middleware::from_fn_with_state(state.clone(), auth_admin));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
