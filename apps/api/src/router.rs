use std::sync::Arc;

use axum::{routing::get, Router};

use admin_cell::router::admin_routes;
use appointment_cell::router::{
    admin_appointment_routes, doctor_appointment_routes, user_appointment_routes,
};
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use shared_database::AppState;
use user_cell::router::user_routes;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "API Working" }))
        .nest(
            "/api/user",
            user_routes(state.clone()).merge(user_appointment_routes(state.clone())),
        )
        .nest(
            "/api/doctor",
            doctor_routes(state.clone()).merge(doctor_appointment_routes(state.clone())),
        )
        .nest(
            "/api/admin",
            admin_routes(state.clone()).merge(admin_appointment_routes(state.clone())),
        )
        .nest("/api/auth", auth_routes(state))
}
