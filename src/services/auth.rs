//! Registration, login and token issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{normalize_email, AuthResponse, LoginRequest, RegisterRequest, User, UserClaims, UserRole},
    repository::users::UsersRepository,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    users: UsersRepository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: UsersRepository, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Issue a signed token for `user_id`
    pub fn issue_token(&self, user_id: Uuid) -> AppResult<String> {
        UserClaims::new(user_id, Utc::now(), self.config.jwt_expiration_days)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a bearer token and return the user id it was issued for
    pub fn verify_token(&self, token: &str) -> AppResult<Uuid> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map(|claims| claims.sub)
            .map_err(|_| AppError::Authentication("Not authorized, token failed".to_string()))
    }

    pub async fn register(&self, data: RegisterRequest) -> AppResult<AuthResponse> {
        data.validate()?;
        let (Some(name), Some(email), Some(password)) = (data.name, data.email, data.password) else {
            return Err(AppError::Validation(
                "Missing required fields: name, email, password".to_string(),
            ));
        };

        let email = normalize_email(&email);
        if self.users.get_by_email(&email).await?.is_some() {
            tracing::warn!("Registration rejected, email already in use");
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(&password)?;
        let user = self
            .users
            .create(name.trim(), &email, &password_hash, UserRole::default())
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        let token = self.issue_token(user.id)?;
        Ok(AuthResponse::new(&user, token))
    }

    pub async fn login(&self, data: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&data.email);
        if email.is_empty() || data.password.is_empty() {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&data.password, &user.password)? {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.issue_token(user.id)?;
        Ok(AuthResponse::new(&user, token))
    }

    /// Resolve the user a verified token points at
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users.get_by_id(id).await.map_err(|e| match e {
            AppError::NotFound(_) => {
                AppError::Authentication("Not authorized, user not found".to_string())
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_JWT_SECRET;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> AuthService {
        // Lazy pool: never connects unless a query runs
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AuthService::new(
            UsersRepository::new(pool),
            AuthConfig {
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                jwt_expiration_days: 30,
            },
        )
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(verify_password("x", "not-a-hash"), Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_issue_and_verify_token() {
        let service = service();
        let user_id = Uuid::new_v4();
        let token = service.issue_token(user_id).unwrap();
        assert_eq!(service.verify_token(&token).unwrap(), user_id);

        match service.verify_token("garbage") {
            Err(AppError::Authentication(msg)) => assert_eq!(msg, "Not authorized, token failed"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let err = service()
            .register(RegisterRequest {
                name: Some("Asha".into()),
                email: None,
                password: Some("pw".into()),
            })
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Missing required fields: email"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let err = service()
            .register(RegisterRequest {
                name: Some("Asha".into()),
                email: Some("not-an-email".into()),
                password: Some("pw".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_with_empty_credentials() {
        let err = service()
            .login(LoginRequest {
                email: "  ".into(),
                password: String::new(),
            })
            .await
            .unwrap_err();
        match err {
            AppError::Authentication(msg) => assert_eq!(msg, INVALID_CREDENTIALS),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
