//! User model and authentication types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User role. Recorded on the account but not consulted for access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

/// User row from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// PHC-formatted Argon2 hash
    pub password: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            token,
        }
    }
}

/// Current user profile
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for MeResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Normalize an email the way it is stored: trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User ID
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl UserClaims {
    pub fn new(user_id: Uuid, issued_at: DateTime<Utc>, lifetime_days: i64) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: user_id,
            iat,
            exp: iat + lifetime_days * 24 * 3600,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token (signature and expiry)
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
