use axum::{
    Json,
    extract::{
        Extension, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::handlers::{
    ErrorResponse, error_response, internal_error, json_rejection, path_rejection,
    validation_failure,
};
use crate::middleware::auth_middleware::AuthenticatedUser;
use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::services::category_service::{CategoryError, CategoryService};

/// Convert CategoryError to HTTP response
impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        match self {
            CategoryError::DuplicateName => error_response(
                StatusCode::CONFLICT,
                "duplicate_name",
                "You already have a category with this name",
            ),
            CategoryError::CategoryNotFound => {
                error_response(StatusCode::NOT_FOUND, "not_found", "Category not found")
            }
            CategoryError::CategoryInUse => error_response(
                StatusCode::CONFLICT,
                "category_in_use",
                "Category is used by existing transactions and cannot be deleted",
            ),
            CategoryError::DatabaseError(ref msg) => internal_error(msg),
        }
    }
}

/// Handler for listing categories
///
/// Returns the authenticated user's categories sorted by name.
#[utoipa::path(
    get,
    path = "/api/categories/",
    responses(
        (status = 200, description = "List of categories", body = Vec<Category>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "categories"
)]
pub async fn list_categories_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Category>>, Response> {
    match category_service.get_categories(auth_user.user_id).await {
        Ok(categories) => Ok(Json(categories)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for creating a category
#[utoipa::path(
    post,
    path = "/api/categories/",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category successfully created", body = Category),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Category name already used", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "categories"
)]
pub async fn create_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), Response> {
    let Json(request) = payload.map_err(json_rejection)?;
    request.validate().map_err(validation_failure)?;

    match category_service
        .create_category(auth_user.user_id, request)
        .await
    {
        Ok(category) => Ok((StatusCode::CREATED, Json(category))),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for fetching a single category
#[utoipa::path(
    get,
    path = "/api/categories/{id}/",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category details", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "categories"
)]
pub async fn get_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Category>, Response> {
    let Path(category_id) = path.map_err(path_rejection)?;
    match category_service
        .get_category(auth_user.user_id, category_id)
        .await
    {
        Ok(category) => Ok(Json(category)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for replacing a category
///
/// `name` and `type` are required; an omitted `icon` keeps the current one.
#[utoipa::path(
    put,
    path = "/api/categories/{id}/",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category successfully updated", body = Category),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category name already used", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "categories"
)]
pub async fn replace_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<Json<Category>, Response> {
    let Path(category_id) = path.map_err(path_rejection)?;
    let Json(request) = payload.map_err(json_rejection)?;
    request.validate().map_err(validation_failure)?;

    match category_service
        .update_category(auth_user.user_id, category_id, request.into())
        .await
    {
        Ok(category) => Ok(Json(category)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for partially updating a category
#[utoipa::path(
    patch,
    path = "/api/categories/{id}/",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category successfully updated", body = Category),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category name already used", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "categories"
)]
pub async fn update_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<Category>, Response> {
    let Path(category_id) = path.map_err(path_rejection)?;
    let Json(request) = payload.map_err(json_rejection)?;
    request.validate().map_err(validation_failure)?;

    match category_service
        .update_category(auth_user.user_id, category_id, request)
        .await
    {
        Ok(category) => Ok(Json(category)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for deleting a category
///
/// Fails with 409 while any transaction still references the category.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}/",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category successfully deleted"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category is in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "categories"
)]
pub async fn delete_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, Response> {
    let Path(category_id) = path.map_err(path_rejection)?;
    match category_service
        .delete_category(auth_user.user_id, category_id)
        .await
    {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(e.into_response()),
    }
}
