use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Details")]
    MissingDetails,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Email already registered")]
    EmailExists,

    #[error("Password must be at least 8 characters")]
    WeakPassword,

    #[error("User does not exist")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::MissingDetails
            | AuthError::InvalidEmail
            | AuthError::EmailExists
            | AuthError::WeakPassword => AppError::ValidationError(err.to_string()),
            AuthError::UserNotFound => AppError::NotFound(err.to_string()),
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::Hashing(msg) | AuthError::Token(msg) => AppError::Internal(msg.clone()),
            AuthError::DatabaseError(msg) => AppError::Database(msg.clone()),
        }
    }
}
