//! Authentication service for login, password hashing and session tokens

use std::sync::OnceLock;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::Driver;

/// Message shown for any failed login, regardless of the cause
pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    secret: String,
    expiry_seconds: i64,
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Driver ID
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Credentials row used for login
#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    id: i64,
    password_hash: String,
    is_active: bool,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            secret: config.session.secret.clone(),
            expiry_seconds: config.session.expiry_seconds,
        }
    }

    /// Verify a username and password and return the driver
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Driver> {
        let credentials = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, password_hash, is_active FROM drivers WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        // Unknown usernames cost the same bcrypt round as known ones
        let Some(credentials) = credentials else {
            let _ = verify_password(password, dummy_hash());
            return Err(AppError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string()));
        };

        let password_ok = verify_password(password, &credentials.password_hash)?;

        if !credentials.is_active {
            tracing::info!(username = %username, "Login attempt for inactive driver");
            return Err(AppError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string()));
        }
        if !password_ok {
            return Err(AppError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string()));
        }

        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers SET last_login = NOW()
            WHERE id = $1
            RETURNING id, username, first_name, last_name, email, license_number,
                      is_staff, is_active, date_joined, last_login
            "#,
        )
        .bind(credentials.id)
        .fetch_one(&self.db)
        .await?;

        Ok(driver)
    }

    /// Username of an active driver, `None` once the account is deleted or
    /// deactivated
    pub async fn active_driver(&self, driver_id: i64) -> AppResult<Option<String>> {
        let username = sqlx::query_scalar::<_, String>(
            "SELECT username FROM drivers WHERE id = $1 AND is_active",
        )
        .bind(driver_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(username)
    }

    /// Issue a signed session token for a driver
    pub fn issue_token(&self, driver_id: i64, username: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: driver_id.to_string(),
            username: username.to_string(),
            exp: (now + Duration::seconds(self.expiry_seconds)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Validate a session token and return its claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            AppError::InvalidToken
        })?;

        Ok(token_data.claims)
    }
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Hash of a throwaway password, checked when the username is unknown
fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| hash("taxi-service-dummy", DEFAULT_COST).unwrap_or_default())
}

/// Check a password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    verify(password, password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}
