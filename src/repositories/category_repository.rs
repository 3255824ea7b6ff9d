use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::category::Category;
use crate::repositories::RepositoryError;

/// Trait defining category repository operations
///
/// Every lookup is scoped to the owning user; another user's category is
/// reported exactly like a missing one.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, category: Category) -> Result<Category, RepositoryError>;

    /// Find a category by ID among the user's categories
    async fn find_by_id(&self, user_id: Uuid, id: Uuid)
    -> Result<Option<Category>, RepositoryError>;

    /// Find all categories owned by a user, sorted by name ascending
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Category>, RepositoryError>;

    /// Overwrite name, type and icon of an existing category
    async fn update(&self, category: Category) -> Result<Category, RepositoryError>;

    /// Delete a category; fails with `ReferenceViolation` while transactions use it
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError>;
}

/// PostgreSQL implementation of CategoryRepository
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, category: Category) -> Result<Category, RepositoryError> {
        let created = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, user_id, name, category_type, icon, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, category_type, icon, user_id, created_at
            "#,
        )
        .bind(category.id)
        .bind(category.user_id)
        .bind(&category.name)
        .bind(category.category_type.as_str())
        .bind(&category.icon)
        .bind(category.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, category_type, icon, user_id, created_at
            FROM categories
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, category_type, icon, user_id, created_at
            FROM categories
            WHERE user_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn update(&self, category: Category) -> Result<Category, RepositoryError> {
        let updated = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $3,
                category_type = $4,
                icon = $5
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, category_type, icon, user_id, created_at
            "#,
        )
        .bind(category.id)
        .bind(category.user_id)
        .bind(&category.name)
        .bind(category.category_type.as_str())
        .bind(&category.icon)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM categories
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }
}
