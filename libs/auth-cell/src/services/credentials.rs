use std::sync::Arc;

use chrono::Utc;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use shared_database::store::{Collection, StoreError};
use shared_database::AppState;
use shared_models::auth::{Principal, Role};
use shared_utils::jwt::{issue_token, validate_token};

use crate::models::{AuthError, LoginRequest, RegisterRequest};
use crate::services::password::{hash_password, verify_password};

const MIN_PASSWORD_LENGTH: usize = 8;
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub struct CredentialService {
    state: Arc<AppState>,
    email_re: Regex,
}

impl CredentialService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            email_re: Regex::new(EMAIL_PATTERN).expect("email pattern is valid"),
        }
    }

    fn collection_for(&self, role: Role) -> &Collection {
        match role {
            Role::User => &self.state.store.users,
            Role::Doctor => &self.state.store.doctors,
            Role::Admin => &self.state.store.admins,
        }
    }

    /// Register a new user and return a signed token.
    pub async fn register_user(&self, request: RegisterRequest) -> Result<String, AuthError> {
        let RegisterRequest {
            name,
            email,
            password,
        } = request;

        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            info!("Register failed: missing details");
            return Err(AuthError::MissingDetails);
        }

        if !self.email_re.is_match(&email) {
            info!("Register failed: invalid email format - {}", email);
            return Err(AuthError::InvalidEmail);
        }

        if password.len() < MIN_PASSWORD_LENGTH {
            info!("Register failed: weak password for email - {}", email);
            return Err(AuthError::WeakPassword);
        }

        let password_hash =
            hash_password(&password).map_err(|e| AuthError::Hashing(e.to_string()))?;

        let id = Uuid::new_v4();
        let user = json!({
            "id": id,
            "name": name,
            "email": email,
            "password_hash": password_hash,
            "phone": "000000000",
            "address": Value::Null,
            "dob": "Not Selected",
            "gender": "Not Selected",
            "image": "",
            "created_at": Utc::now(),
        });

        // Uniqueness check and insert share the collection write lock
        match self.state.store.users.insert_unique(id, user, "email").await {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                info!("Register failed: email already registered - {}", email);
                return Err(AuthError::EmailExists);
            }
            Err(e) => return Err(AuthError::DatabaseError(e.to_string())),
        }

        let token = issue_token(id, Role::User, &self.state.config.jwt_secret)
            .map_err(AuthError::Token)?;

        info!("User registered successfully: {}", email);
        Ok(token)
    }

    /// Verify credentials against the role's collection and return a token.
    pub async fn login(&self, request: LoginRequest, role: Role) -> Result<String, AuthError> {
        let LoginRequest { email, password } = request;

        if email.trim().is_empty() || password.is_empty() {
            info!("Login failed: missing details");
            return Err(AuthError::MissingDetails);
        }

        let record = self
            .collection_for(role)
            .find_by_field("email", &email)
            .await
            .ok_or_else(|| {
                info!("Login failed: {} does not exist - {}", role, email);
                AuthError::UserNotFound
            })?;

        let stored_hash = record
            .get("password_hash")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::DatabaseError("Record missing password hash".to_string()))?;

        let matches = verify_password(&password, stored_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !matches {
            info!("Login failed: invalid credentials for email - {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let id = record
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| AuthError::DatabaseError("Record missing id".to_string()))?;

        let token =
            issue_token(id, role, &self.state.config.jwt_secret).map_err(AuthError::Token)?;

        info!("{} logged in successfully: {}", role, email);
        Ok(token)
    }

    /// Verify a token and check its embedded role claim.
    pub fn verify(&self, token: &str, expected_role: Role) -> Result<Principal, AuthError> {
        let principal =
            validate_token(token, &self.state.config.jwt_secret).map_err(AuthError::Token)?;

        if principal.role != expected_role {
            warn!(
                "Role mismatch: token for {} used where {} was expected",
                principal.role, expected_role
            );
            return Err(AuthError::InvalidCredentials);
        }

        Ok(principal)
    }

    /// Seed the admin principal from configuration. The admin authenticates
    /// against a stored argon2 hash like any other principal.
    pub async fn ensure_admin(&self) -> Result<Option<Uuid>, AuthError> {
        let email = self.state.config.admin_email.clone();
        let password = self.state.config.admin_password.clone();

        if email.is_empty() || password.is_empty() {
            warn!("Admin credentials not configured, skipping admin seeding");
            return Ok(None);
        }

        if let Some(existing) = self.state.store.admins.find_by_field("email", &email).await {
            let id = existing
                .get("id")
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(|| AuthError::DatabaseError("Admin record missing id".to_string()))?;
            return Ok(Some(id));
        }

        let password_hash =
            hash_password(&password).map_err(|e| AuthError::Hashing(e.to_string()))?;

        let id = Uuid::new_v4();
        let admin = json!({
            "id": id,
            "email": email,
            "password_hash": password_hash,
            "created_at": Utc::now(),
        });

        self.state
            .store
            .admins
            .insert_unique(id, admin, "email")
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        info!("Admin principal seeded: {}", email);
        Ok(Some(id))
    }
}
