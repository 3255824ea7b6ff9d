use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use validator::Validate;

use crate::handlers::{
    ErrorResponse, error_response, field_error, internal_error, json_rejection, validation_failure,
};
use crate::models::auth::{AuthToken, LoginRequest};
use crate::models::user::{CreateUserRequest, RegisterResponse};
use crate::services::auth_service::{AuthError, AuthService};

/// Convert AuthError to HTTP response
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::DuplicateUsername => field_error("username", &self.to_string()),
            AuthError::InvalidCredentials => error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password",
            ),
            AuthError::InvalidToken => error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authentication token",
            ),
            AuthError::TokenExpired => error_response(
                StatusCode::UNAUTHORIZED,
                "token_expired",
                "Authentication token has expired",
            ),
            AuthError::DatabaseError(ref msg) => internal_error(msg),
        }
    }
}

/// Handler for user registration
///
/// Creates a new user account and seeds its default categories.
#[utoipa::path(
    post,
    path = "/api/register/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User successfully registered", body = RegisterResponse),
        (status = 400, description = "Validation error or username taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(auth_service): State<Arc<dyn AuthService>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), Response> {
    let Json(request) = payload.map_err(json_rejection)?;

    // Validate request body
    request.validate().map_err(validation_failure)?;

    match auth_service.register(request).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(RegisterResponse::new(user)))),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for user login
///
/// Authenticates a user and returns a JWT token.
#[utoipa::path(
    post,
    path = "/api/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthToken),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(auth_service): State<Arc<dyn AuthService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthToken>, Response> {
    let Json(request) = payload.map_err(json_rejection)?;

    match auth_service.login(request).await {
        Ok(token) => Ok(Json(token)),
        Err(e) => Err(e.into_response()),
    }
}
