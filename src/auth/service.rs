//! Identity service: registration, login and session resolution.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::store::{InMemoryUserStore, StoreError, User, UserStore};
use crate::auth::token::{TokenError, TokenService};
use crate::auth::types::RegisterRequest;
use crate::config::AuthConfig;
use crate::error::ApiError;

/// Verified against when the email is unknown so both login failures cost
/// one bcrypt comparison.
const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Duplicate email Entered")]
    DuplicateEmail,

    #[error("Please Enter Email & Password")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please Login to access this resource")]
    MissingSession,

    #[error("Json Web Token is invalid, Try again")]
    InvalidToken,

    #[error("Json Web Token is Expired, Try again")]
    ExpiredToken,

    #[error("User no longer exists")]
    UnknownUser,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(_) | AuthError::DuplicateEmail | AuthError::MissingCredentials => {
                ApiError::InvalidArgument(err.to_string())
            }
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::MissingSession
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::UnknownUser => ApiError::Unauthenticated(err.to_string()),
            AuthError::Hashing(_) | AuthError::Signing(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::Invalid(_) => AuthError::InvalidToken,
            TokenError::Signing(e) => AuthError::Signing(e),
        }
    }
}

/// A user together with a freshly issued session token.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Owns the user store and token service. Constructed once at startup.
pub struct IdentityService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
    bcrypt_cost: u32,
    dummy_hash: String,
}

impl IdentityService {
    pub fn new(
        store: Arc<dyn UserStore>,
        tokens: TokenService,
        bcrypt_cost: u32,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD, bcrypt_cost)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self {
            store,
            tokens,
            bcrypt_cost,
            dummy_hash,
        })
    }

    /// Build with the in-process store.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(
            Arc::new(InMemoryUserStore::new()),
            TokenService::new(&config.jwt_secret, config.jwt_expiry_secs),
            config.bcrypt_cost,
        )
    }

    /// Validate, hash and store a new user, then issue a token.
    pub async fn register(&self, mut request: RegisterRequest) -> Result<Session, AuthError> {
        request.email = request.email.map(|e| normalize_email(&e));
        request
            .validate()
            .map_err(|e| AuthError::Validation(validation_message(&e)))?;

        // `validate` guarantees every field is present.
        let (Some(name), Some(email), Some(password), Some(number)) =
            (request.name, request.email, request.password, request.number)
        else {
            return Err(AuthError::Validation("Missing required fields".to_string()));
        };

        if self.store.find_by_email(&email).is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let user = self.store.insert(User {
            id: Uuid::new_v4(),
            name,
            email,
            number,
            password_hash,
            created_at: Utc::now(),
        })?;
        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(Session { user, token })
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = self.store.find_by_email(&normalize_email(email));
        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());
        let candidate = password.to_string();

        let matched = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored_hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        match user {
            Some(user) if matched => {
                let token = self.tokens.issue(user.id)?;
                tracing::info!(user_id = %user.id, "User logged in");
                Ok(Session { user, token })
            }
            _ => {
                tracing::debug!("Login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Resolve a session token to its user.
    pub fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify(token)?;
        let id = Uuid::parse_str(&claims.id).map_err(|_| AuthError::InvalidToken)?;
        self.store.find_by_id(id).ok_or(AuthError::UnknownUser)
    }
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityService")
            .field("tokens", &self.tokens)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Flatten field errors into one message, ordered by field name.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> IdentityService {
        let config = AuthConfig {
            jwt_secret: "unit-test-secret".into(),
            bcrypt_cost: 4,
            ..AuthConfig::default()
        };
        IdentityService::from_config(&config).unwrap()
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("Ada Lovelace".into()),
            email: Some(email.into()),
            password: Some("correct horse".into()),
            number: Some(9876543210),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let identity = service();
        let registered = identity.register(registration("Ada@Example.com ")).await.unwrap();
        assert_eq!(registered.user.email, "ada@example.com");
        assert_ne!(registered.user.password_hash, "correct horse");

        let session = identity.login("ada@example.com", "correct horse").await.unwrap();
        assert_eq!(session.user.id, registered.user.id);

        let current = identity.current_user(&session.token).unwrap();
        assert_eq!(current.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_login_failures_share_a_message() {
        let identity = service();
        identity.register(registration("ada@example.com")).await.unwrap();

        let wrong_password = identity
            .login("ada@example.com", "wrong password")
            .await
            .unwrap_err();
        let unknown_email = identity
            .login("nobody@example.com", "correct horse")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let identity = service();
        let err = identity.login("", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
        let err = identity.login("ada@example.com", "").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let identity = service();
        identity.register(registration("ada@example.com")).await.unwrap();
        let err = identity
            .register(registration("ADA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_validation_messages() {
        let identity = service();
        let err = identity
            .register(RegisterRequest {
                name: Some("Al".into()),
                email: Some("not-an-email".into()),
                password: Some("short".into()),
                number: None,
            })
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Please Enter a valid Email"));
        assert!(message.contains("Name must be between 4 and 30 characters"));
        assert!(message.contains("Please Enter Your Number"));
        assert!(message.contains("Password should be at least 8 characters"));
        assert!(matches!(ApiError::from(err), ApiError::InvalidArgument(_)));
    }

    #[test]
    fn test_current_user_rejects_unknown_subject() {
        let identity = service();
        let token = identity.tokens.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(
            identity.current_user(&token),
            Err(AuthError::UnknownUser)
        ));
        assert!(matches!(
            identity.current_user("garbage"),
            Err(AuthError::InvalidToken)
        ));
    }
}
