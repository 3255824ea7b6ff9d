//! Router assembly: shared state, public and protected routes, API docs.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::ErrorResponse;
use crate::handlers::auth_handlers::{login_handler, register_handler};
use crate::handlers::category_handlers::{
    create_category_handler, delete_category_handler, get_category_handler,
    list_categories_handler, replace_category_handler, update_category_handler,
};
use crate::handlers::transaction_handlers::{
    by_category_handler, create_transaction_handler, delete_transaction_handler,
    get_transaction_handler, list_transactions_handler, replace_transaction_handler,
    summary_handler, update_transaction_handler,
};
use crate::middleware::auth_middleware::auth_middleware;
use crate::models::{
    AuthToken, Category, CategoryAmount, CategoryType, CreateCategoryRequest,
    CreateTransactionRequest, CreateUserRequest, LoginRequest, RegisterResponse, Transaction,
    TransactionSummary, UpdateCategoryRequest, UpdateTransactionRequest, User,
};
use crate::services::auth_service::AuthService;
use crate::services::category_service::CategoryService;
use crate::services::transaction_service::TransactionService;

/// The state shared by every handler
#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub category_service: Arc<dyn CategoryService>,
    pub transaction_service: Arc<dyn TransactionService>,
}

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handlers::register_handler,
        crate::handlers::auth_handlers::login_handler,
        crate::handlers::category_handlers::list_categories_handler,
        crate::handlers::category_handlers::create_category_handler,
        crate::handlers::category_handlers::get_category_handler,
        crate::handlers::category_handlers::replace_category_handler,
        crate::handlers::category_handlers::update_category_handler,
        crate::handlers::category_handlers::delete_category_handler,
        crate::handlers::transaction_handlers::list_transactions_handler,
        crate::handlers::transaction_handlers::create_transaction_handler,
        crate::handlers::transaction_handlers::get_transaction_handler,
        crate::handlers::transaction_handlers::replace_transaction_handler,
        crate::handlers::transaction_handlers::update_transaction_handler,
        crate::handlers::transaction_handlers::delete_transaction_handler,
        crate::handlers::transaction_handlers::summary_handler,
        crate::handlers::transaction_handlers::by_category_handler,
    ),
    components(
        schemas(
            User, CreateUserRequest, RegisterResponse, LoginRequest, AuthToken,
            Category, CategoryType, CreateCategoryRequest, UpdateCategoryRequest,
            Transaction, CreateTransactionRequest, UpdateTransactionRequest,
            TransactionSummary, CategoryAmount, ErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "categories", description = "Income and expense categories"),
        (name = "transactions", description = "Transactions and their aggregates")
    ),
    info(
        title = "Finance Tracker API",
        version = "0.1.0",
        description = "REST API for tracking personal income and expenses",
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Return a router with all the app's routes
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route("/api/register/", post(register_handler))
        .route("/api/login/", post(login_handler));

    let protected_routes = Router::new()
        .route(
            "/api/categories/",
            get(list_categories_handler).post(create_category_handler),
        )
        .route(
            "/api/categories/{id}/",
            get(get_category_handler)
                .put(replace_category_handler)
                .patch(update_category_handler)
                .delete(delete_category_handler),
        )
        .route(
            "/api/transactions/",
            get(list_transactions_handler).post(create_transaction_handler),
        )
        .route("/api/transactions/summary/", get(summary_handler))
        .route("/api/transactions/by_category/", get(by_category_handler))
        .route(
            "/api/transactions/{id}/",
            get(get_transaction_handler)
                .put(replace_transaction_handler)
                .patch(update_transaction_handler)
                .delete(delete_transaction_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    protected_routes
        .merge(unprotected_routes)
        .route("/health", get(health_check))
        .with_state(state)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for path in [
            "/api/register/",
            "/api/login/",
            "/api/categories/",
            "/api/categories/{id}/",
            "/api/transactions/",
            "/api/transactions/{id}/",
            "/api/transactions/summary/",
            "/api/transactions/by_category/",
        ] {
            assert!(paths.contains(&path), "missing {path}");
        }

        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
