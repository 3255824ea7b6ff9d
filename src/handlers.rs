pub mod auth_handlers;
pub mod category_handlers;
pub mod transaction_handlers;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Key `validator` files struct-level errors under
const SCHEMA_ERRORS_KEY: &str = "__all__";
const NON_FIELD_ERRORS_KEY: &str = "non_field_errors";

/// Error response structure
///
/// `fields` is only present on validation errors and maps each offending
/// field to its messages.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "validation_error",
    "message": "amount: Amount must be greater than 0",
    "fields": {"amount": ["Amount must be greater than 0"]}
}))]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            fields: None,
        }
    }

    /// Build a `validation_error` response body from per-field messages
    pub fn validation(fields: BTreeMap<String, Vec<String>>) -> Self {
        let message = fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            error: "validation_error".to_string(),
            message,
            fields: Some(fields),
        }
    }
}

/// Respond with a JSON error body
pub fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(ErrorResponse::new(error, message))).into_response()
}

/// Respond with `500 database_error`, logging the cause instead of echoing it
pub fn internal_error(cause: &str) -> Response {
    tracing::error!("Storage failure: {}", cause);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "database_error",
        "Internal server error",
    )
}

/// Respond with a 400 naming a single invalid field
pub fn field_error(field: &str, message: &str) -> Response {
    let fields = BTreeMap::from([(field.to_string(), vec![message.to_string()])]);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::validation(fields)),
    )
        .into_response()
}

/// Convert `validator` errors to a 400 response listing every failing field
pub fn validation_failure(errors: ValidationErrors) -> Response {
    let fields = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let field: &str = &field;
            let field = match field {
                SCHEMA_ERRORS_KEY => NON_FIELD_ERRORS_KEY.to_string(),
                name => name.to_string(),
            };
            let messages = errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field, messages)
        })
        .collect();

    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::validation(fields)),
    )
        .into_response()
}

/// Convert a body that failed to parse into a 400 response
pub fn json_rejection(rejection: JsonRejection) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "validation_error",
        &rejection.body_text(),
    )
}

/// Convert a query string that failed to parse into a 400 response
pub fn query_rejection(rejection: QueryRejection) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "validation_error",
        &rejection.body_text(),
    )
}

/// Convert an id that is not a UUID into a 404, since no row can match it
pub fn path_rejection(rejection: PathRejection) -> Response {
    tracing::debug!("rejected path parameter: {}", rejection.body_text());
    error_response(StatusCode::NOT_FOUND, "not_found", "Not found.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_validation_failure_lists_fields() {
        let mut errors = ValidationErrors::new();
        let mut error = ValidationError::new("invalid_amount");
        error.message = Some("Amount must be greater than 0".into());
        errors.add("amount", error);
        errors.add("__all__", ValidationError::new("password_too_similar"));

        let response = validation_failure(errors);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["fields"]["amount"][0], "Amount must be greater than 0");
        assert_eq!(body["fields"]["non_field_errors"][0], "password_too_similar");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("amount: Amount must be greater than 0")
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let response = internal_error("connection refused by 10.0.0.3");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "database_error");
        assert!(!body["message"].as_str().unwrap().contains("10.0.0.3"));
        assert!(body.get("fields").is_none());
    }
}
