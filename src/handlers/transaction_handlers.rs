use axum::{
    Json,
    extract::{
        Extension, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::handlers::{
    ErrorResponse, error_response, field_error, internal_error, json_rejection, path_rejection,
    query_rejection, validation_failure,
};
use crate::middleware::auth_middleware::AuthenticatedUser;
use crate::models::filters::TransactionFilters;
use crate::models::summary::{CategoryAmount, TransactionSummary};
use crate::models::transaction::{
    CreateTransactionRequest, Transaction, UpdateTransactionRequest,
};
use crate::services::transaction_service::{TransactionError, TransactionService};

/// Convert TransactionError to HTTP response
impl IntoResponse for TransactionError {
    fn into_response(self) -> Response {
        match self {
            TransactionError::InvalidCategory => field_error("category", &self.to_string()),
            TransactionError::TransactionNotFound => error_response(
                StatusCode::NOT_FOUND,
                "not_found",
                "Transaction not found",
            ),
            TransactionError::DatabaseError(ref msg) => internal_error(msg),
        }
    }
}

/// Handler for creating a transaction
///
/// The referenced category must belong to the authenticated user.
#[utoipa::path(
    post,
    path = "/api/transactions/",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction successfully created", body = Transaction),
        (status = 400, description = "Validation error (amount, date, unknown category)", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn create_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Response> {
    let Json(request) = payload.map_err(json_rejection)?;

    // Validate request body
    request.validate().map_err(validation_failure)?;

    match transaction_service
        .create_transaction(auth_user.user_id, request)
        .await
    {
        Ok(transaction) => Ok((StatusCode::CREATED, Json(transaction))),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for listing transactions
///
/// Retrieves the authenticated user's transactions matching the filters,
/// most recent date first.
#[utoipa::path(
    get,
    path = "/api/transactions/",
    params(TransactionFilters),
    responses(
        (status = 200, description = "List of transactions", body = Vec<Transaction>),
        (status = 400, description = "Malformed filter value", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn list_transactions_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    filters: Result<Query<TransactionFilters>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, Response> {
    let Query(filters) = filters.map_err(query_rejection)?;

    match transaction_service
        .get_transactions(auth_user.user_id, &filters)
        .await
    {
        Ok(transactions) => Ok(Json(transactions)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for fetching a single transaction
#[utoipa::path(
    get,
    path = "/api/transactions/{id}/",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction details", body = Transaction),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn get_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Transaction>, Response> {
    let Path(transaction_id) = path.map_err(path_rejection)?;
    match transaction_service
        .get_transaction(auth_user.user_id, transaction_id)
        .await
    {
        Ok(transaction) => Ok(Json(transaction)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for replacing a transaction
///
/// `category`, `amount` and `date` are required.
#[utoipa::path(
    put,
    path = "/api/transactions/{id}/",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    request_body = CreateTransactionRequest,
    responses(
        (status = 200, description = "Transaction successfully updated", body = Transaction),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn replace_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<Json<Transaction>, Response> {
    let Path(transaction_id) = path.map_err(path_rejection)?;
    let Json(request) = payload.map_err(json_rejection)?;
    request.validate().map_err(validation_failure)?;

    match transaction_service
        .update_transaction(auth_user.user_id, transaction_id, request.into())
        .await
    {
        Ok(transaction) => Ok(Json(transaction)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for partially updating a transaction
#[utoipa::path(
    patch,
    path = "/api/transactions/{id}/",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction successfully updated", body = Transaction),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn update_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Result<Json<Transaction>, Response> {
    let Path(transaction_id) = path.map_err(path_rejection)?;
    let Json(request) = payload.map_err(json_rejection)?;
    request.validate().map_err(validation_failure)?;

    match transaction_service
        .update_transaction(auth_user.user_id, transaction_id, request)
        .await
    {
        Ok(transaction) => Ok(Json(transaction)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for deleting a transaction
#[utoipa::path(
    delete,
    path = "/api/transactions/{id}/",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 204, description = "Transaction successfully deleted"),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn delete_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, Response> {
    let Path(transaction_id) = path.map_err(path_rejection)?;
    match transaction_service
        .delete_transaction(auth_user.user_id, transaction_id)
        .await
    {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for the income/expense summary
///
/// Accepts the same filters as the transaction list.
#[utoipa::path(
    get,
    path = "/api/transactions/summary/",
    params(TransactionFilters),
    responses(
        (status = 200, description = "Totals over the filtered transactions", body = TransactionSummary),
        (status = 400, description = "Malformed filter value", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn summary_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    filters: Result<Query<TransactionFilters>, QueryRejection>,
) -> Result<Json<TransactionSummary>, Response> {
    let Query(filters) = filters.map_err(query_rejection)?;

    match transaction_service
        .get_summary(auth_user.user_id, &filters)
        .await
    {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for the expense breakdown per category
///
/// Accepts the same filters as the transaction list; income transactions are
/// never included.
#[utoipa::path(
    get,
    path = "/api/transactions/by_category/",
    params(TransactionFilters),
    responses(
        (status = 200, description = "Expense totals per category name", body = Vec<CategoryAmount>),
        (status = 400, description = "Malformed filter value", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn by_category_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    filters: Result<Query<TransactionFilters>, QueryRejection>,
) -> Result<Json<Vec<CategoryAmount>>, Response> {
    let Query(filters) = filters.map_err(query_rejection)?;

    match transaction_service
        .get_by_category(auth_user.user_id, &filters)
        .await
    {
        Ok(breakdown) => Ok(Json(breakdown)),
        Err(e) => Err(e.into_response()),
    }
}
