use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::category::Category;
use crate::models::user::User;
use crate::repositories::RepositoryError;

/// Trait defining user repository operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user together with its initial categories
    ///
    /// Either the user and every category are stored, or nothing is.
    async fn create(&self, user: User, categories: Vec<Category>) -> Result<User, RepositoryError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User, categories: Vec<Category>) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&mut *tx)
        .await?;

        for category in &categories {
            sqlx::query(
                r#"
                INSERT INTO categories (id, user_id, name, category_type, icon, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(category.id)
            .bind(created.id)
            .bind(&category.name)
            .bind(category.category_type.as_str())
            .bind(&category.icon)
            .bind(category.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
