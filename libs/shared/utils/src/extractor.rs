use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_database::AppState;
use shared_models::auth::{Principal, Role};
use shared_models::error::AppError;

use crate::jwt::validate_token;

const NOT_AUTHORIZED: &str = "Not Authorized, Login Again";

// The wire convention keeps one header per role (token/dtoken/atoken), but
// authorization is decided by the signed role claim inside the token.
fn authorize(
    state: &AppState,
    request: &mut Request<Body>,
    expected_role: Role,
) -> Result<(), AppError> {
    let header = request
        .headers()
        .get(expected_role.header_name())
        .ok_or_else(|| AppError::Auth(NOT_AUTHORIZED.to_string()))?;

    let token = header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid token header".to_string()))?;

    let principal = validate_token(token, &state.config.jwt_secret).map_err(AppError::Auth)?;

    if principal.role != expected_role {
        tracing::warn!(
            "Role mismatch: token for {} presented on a {} route",
            principal.role,
            expected_role
        );
        return Err(AppError::Auth(NOT_AUTHORIZED.to_string()));
    }

    request.extensions_mut().insert(principal);
    Ok(())
}

pub async fn auth_user(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, &mut request, Role::User)?;
    Ok(next.run(request).await)
}

pub async fn auth_doctor(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, &mut request, Role::Doctor)?;
    Ok(next.run(request).await)
}

pub async fn auth_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, &mut request, Role::Admin)?;
    Ok(next.run(request).await)
}

/// Principal placed into request extensions by the auth middleware.
pub fn extract_principal<B>(request: &Request<B>) -> Result<Principal, AppError> {
    request
        .extensions()
        .get::<Principal>()
        .cloned()
        .ok_or_else(|| AppError::Auth("Principal not found in request extensions".to_string()))
}
