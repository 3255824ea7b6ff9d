use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use finance_tracker::logging::{add_tracing_layer, setup_logging};
use finance_tracker::repositories::category_repository::PostgresCategoryRepository;
use finance_tracker::repositories::transaction_repository::PostgresTransactionRepository;
use finance_tracker::repositories::user_repository::PostgresUserRepository;
use finance_tracker::services::auth_service::AuthServiceImpl;
use finance_tracker::services::category_service::CategoryServiceImpl;
use finance_tracker::services::transaction_service::TransactionServiceImpl;
use finance_tracker::{AppState, Config, build_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();
    setup_logging();

    let config = Config::from_env()?;

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations completed");

    // Initialize repositories
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let category_repository = Arc::new(PostgresCategoryRepository::new(pool.clone()));
    let transaction_repository = Arc::new(PostgresTransactionRepository::new(pool));

    // Initialize services
    let state = AppState {
        auth_service: Arc::new(
            AuthServiceImpl::new(user_repository, config.jwt_secret.clone())
                .with_token_ttl(config.token_ttl),
        ),
        category_service: Arc::new(CategoryServiceImpl::new(category_repository.clone())),
        transaction_service: Arc::new(TransactionServiceImpl::new(
            transaction_repository,
            category_repository,
        )),
    };

    let app = add_tracing_layer(build_router(state));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("API docs at http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
