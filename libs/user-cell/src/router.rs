use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_user;

use crate::handlers;

/// Registration, login and profile routes. Appointment-facing user routes
/// are mounted alongside these by the API router.
pub fn user_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let protected_routes = Router::new()
        .route("/getProfile", get(handlers::get_profile))
        .route("/updateProfile", post(handlers::update_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_user));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
