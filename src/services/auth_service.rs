use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::auth::{AuthToken, LoginRequest};
use crate::models::category::{Category, DEFAULT_CATEGORIES};
use crate::models::user::{CreateUserRequest, User};
use crate::repositories::RepositoryError;
use crate::repositories::user_repository::UserRepository;

/// Default token lifetime in hours
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    exp: i64,    // expiration timestamp
}

/// Authentication service errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("A user with that username already exists.")]
    DuplicateUsername,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<RepositoryError> for AuthError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ConstraintViolation(_) => AuthError::DuplicateUsername,
            e => AuthError::DatabaseError(e.to_string()),
        }
    }
}

/// Trait defining authentication service operations
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and seed their default categories
    async fn register(&self, request: CreateUserRequest) -> Result<User, AuthError>;

    /// Authenticate user and return JWT token
    async fn login(&self, request: LoginRequest) -> Result<AuthToken, AuthError>;

    /// Validate JWT token and return user_id
    async fn validate_token(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// Implementation of AuthService
pub struct AuthServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    jwt_secret: String,
    token_ttl: Duration,
    hash_cost: u32,
}

impl AuthServiceImpl {
    pub fn new(user_repository: Arc<dyn UserRepository>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            hash_cost: DEFAULT_COST,
        }
    }

    /// Set how long issued tokens stay valid
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Set the bcrypt cost used for new password hashes
    pub fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    /// Hash a password using bcrypt
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        hash(password, self.hash_cost)
            .map_err(|e| AuthError::DatabaseError(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against a hash
    fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        verify(password, hash)
            .map_err(|e| AuthError::DatabaseError(format!("Password verification failed: {}", e)))
    }

    /// Generate a JWT token for a user
    fn generate_jwt(&self, user_id: Uuid) -> Result<AuthToken, AuthError> {
        let expiration = Utc::now() + self.token_ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::DatabaseError(format!("Token generation failed: {}", e)))?;

        Ok(AuthToken {
            token,
            expires_at: expiration,
        })
    }

    /// Decode and validate a JWT token
    fn decode_jwt(&self, token: &str) -> Result<Uuid, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Uuid::parse_str(&token_data.claims.sub).map_err(|_| AuthError::InvalidToken)
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: CreateUserRequest) -> Result<User, AuthError> {
        if self
            .user_repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash = self.hash_password(&request.password)?;

        let user = User {
            id: Uuid::new_v4(),
            username: request.username,
            email: request.email.filter(|email| !email.is_empty()),
            password_hash,
            created_at: Utc::now(),
        };

        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, category_type)| Category::new(user.id, name, *category_type, ""))
            .collect();

        let user = self.user_repository.create(user, categories).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "registered user");

        Ok(user)
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthToken, AuthError> {
        let Some(user) = self
            .user_repository
            .find_by_username(&request.username)
            .await?
        else {
            tracing::warn!(username = %request.username, "login attempt for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        let is_valid = Self::verify_password(&request.password, &user.password_hash)?;
        if !is_valid {
            tracing::warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        self.generate_jwt(user.id)
    }

    async fn validate_token(&self, token: &str) -> Result<Uuid, AuthError> {
        self.decode_jwt(token)
    }
}
