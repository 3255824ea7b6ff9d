use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{
    validate_email_or_blank, validate_password_differs_from_username, validate_password_strength,
    validate_username,
};

/// Message returned alongside a freshly registered user
pub const REGISTRATION_MESSAGE: &str = "Usuario registrado exitosamente";

/// User entity representing a registered account
#[derive(Debug, Clone, Serialize, ToSchema, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Request payload for user registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_password_differs_from_username"))]
#[schema(example = json!({
    "username": "maria",
    "email": "maria@example.com",
    "password": "securepassword123"
}))]
pub struct CreateUserRequest {
    #[validate(
        length(
            min = 1,
            max = 150,
            message = "Username must be between 1 and 150 characters"
        ),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(custom(function = "validate_email_or_blank"))]
    pub email: Option<String>,

    #[validate(
        length(
            min = 8,
            message = "This password is too short. It must contain at least 8 characters."
        ),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
}

/// Response body for a successful registration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
    pub message: String,
}

impl RegisterResponse {
    pub fn new(user: User) -> Self {
        Self {
            user,
            message: REGISTRATION_MESSAGE.to_string(),
        }
    }
}
