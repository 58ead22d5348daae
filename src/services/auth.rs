//! Authentication service for signup, login and JWT handling
//!
//! Provides:
//! - User registration and login
//! - JWT token generation and validation
//!
//! Password hashing happens in the users repository on write; this service
//! only hands it plaintext tagged as such.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, DEFAULT_TOKEN_LIFETIME_SECS};
use crate::db::{CreateUser, Database, Password, UserRecord};

// ============================================================================
// JWT Claims
// ============================================================================

/// Identity embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub username: String,
    pub email: String,
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    data: TokenData,
    /// Expiration timestamp
    exp: i64,
    /// Issued at timestamp
    iat: i64,
}

// ============================================================================
// Auth Types
// ============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Could not authenticate user.")]
    InvalidCredentials,

    #[error("Failed to create user.")]
    SignupFailed,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Signed token plus the user it was issued for
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserRecord,
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 2 hours)
    pub token_lifetime: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME_SECS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime: config.token_lifetime_secs,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a new user and sign a token for them.
    ///
    /// Every failure collapses into [AuthError::SignupFailed]; the cause is logged.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthPayload, AuthError> {
        let username = input.username.clone();

        let user = self
            .db
            .users()
            .create(CreateUser {
                username: input.username,
                email: input.email,
                password: Password::Plaintext(input.password),
            })
            .await
            .map_err(|e| {
                tracing::error!(username = %username, error = %e, "Error creating user");
                AuthError::SignupFailed
            })?;

        let token = self
            .sign_token(&user.username, &user.email, &user.id)
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Error signing token for new user");
                AuthError::SignupFailed
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(AuthPayload { token, user })
    }

    /// Login with email and password. The email is trimmed the same way signup stores it.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, AuthError> {
        let user = self
            .db
            .users()
            .get_by_email(email.trim())
            .await
            .map_err(anyhow::Error::from)?
            .ok_or(AuthError::InvalidCredentials)?;

        let correct = user
            .is_correct_password(password)
            .await
            .map_err(anyhow::Error::from)?;
        if !correct {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.sign_token(&user.username, &user.email, &user.id)?;
        Ok(AuthPayload { token, user })
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Sign a token carrying `{username, email, _id}` that expires after the configured lifetime
    pub fn sign_token(&self, username: &str, email: &str, id: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_lifetime);

        let claims = Claims {
            data: TokenData {
                username: username.to_string(),
                email: email.to_string(),
                id: id.to_string(),
            },
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Check signature and expiry, returning the embedded identity
    pub fn verify_token(&self, token: &str) -> Result<TokenData, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    async fn service(lifetime: i64) -> (AuthService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(dir.path().join("auth.db").to_str().unwrap())
            .await
            .unwrap()
            .with_bcrypt_cost(4);
        db.migrate().await.unwrap();
        let config = AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            token_lifetime: lifetime,
        };
        (AuthService::new(db, config), dir)
    }

    #[tokio::test]
    async fn test_sign_then_verify_returns_payload() {
        let (auth, _dir) = service(DEFAULT_TOKEN_LIFETIME_SECS).await;
        let token = auth.sign_token("alice", "alice@example.com", "id-1").unwrap();

        let data = auth.verify_token(&token).unwrap();
        assert_eq!(
            data,
            TokenData {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                id: "id-1".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (auth, _dir) = service(-30).await;
        let token = auth.sign_token("alice", "alice@example.com", "id-1").unwrap();
        assert_matches!(auth.verify_token(&token), Err(AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_token_from_other_secret_rejected() {
        let (auth, _dir) = service(DEFAULT_TOKEN_LIFETIME_SECS).await;
        let other = AuthService::new(auth.db.clone(), AuthConfig::new("another-secret"));
        let token = other.sign_token("alice", "alice@example.com", "id-1").unwrap();
        assert_matches!(auth.verify_token(&token), Err(AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_register_stores_hash_and_login_succeeds() {
        let (auth, _dir) = service(DEFAULT_TOKEN_LIFETIME_SECS).await;
        let registered = auth
            .register(RegisterInput {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();

        assert_ne!(registered.user.password_hash, "secret123");

        let login = auth.login("alice@example.com", "secret123").await.unwrap();
        assert_eq!(login.user.id, registered.user.id);
        assert_eq!(auth.verify_token(&login.token).unwrap().id, registered.user.id);
    }

    #[tokio::test]
    async fn test_login_with_padded_email_as_typed_at_signup() {
        let (auth, _dir) = service(DEFAULT_TOKEN_LIFETIME_SECS).await;
        let registered = auth
            .register(RegisterInput {
                username: "alice".to_string(),
                email: "  alice@example.com ".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(registered.user.email, "alice@example.com");

        let login = auth.login("  alice@example.com ", "secret123").await.unwrap();
        assert_eq!(login.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (auth, _dir) = service(DEFAULT_TOKEN_LIFETIME_SECS).await;
        auth.register(RegisterInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        })
        .await
        .unwrap();

        let wrong_pw = auth.login("alice@example.com", "nope").await.unwrap_err();
        let wrong_email = auth.login("bob@example.com", "secret123").await.unwrap_err();
        assert_eq!(wrong_pw.to_string(), wrong_email.to_string());
        assert_matches!(wrong_pw, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_register_duplicate_collapses_to_generic_error() {
        let (auth, _dir) = service(DEFAULT_TOKEN_LIFETIME_SECS).await;
        let input = RegisterInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        };
        auth.register(input.clone()).await.unwrap();

        let err = auth.register(input).await.unwrap_err();
        assert_matches!(err, AuthError::SignupFailed);
        assert_eq!(err.to_string(), "Failed to create user.");
    }
}
