use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::repositories::RepositoryError;
use crate::repositories::category_repository::CategoryRepository;

/// Category service errors
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Category with this name already exists")]
    DuplicateName,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Category is in use and cannot be deleted")]
    CategoryInUse,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<RepositoryError> for CategoryError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => CategoryError::CategoryNotFound,
            RepositoryError::ConstraintViolation(_) => CategoryError::DuplicateName,
            RepositoryError::ReferenceViolation(_) => CategoryError::CategoryInUse,
            RepositoryError::DatabaseError(msg) => CategoryError::DatabaseError(msg),
        }
    }
}

/// Trait defining category service operations
///
/// Every operation runs on behalf of `user_id` and only sees that user's categories.
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Get all of the user's categories, sorted by name
    async fn get_categories(&self, user_id: Uuid) -> Result<Vec<Category>, CategoryError>;

    /// Get one of the user's categories
    async fn get_category(&self, user_id: Uuid, category_id: Uuid)
    -> Result<Category, CategoryError>;

    /// Create a category for the user
    async fn create_category(
        &self,
        user_id: Uuid,
        request: CreateCategoryRequest,
    ) -> Result<Category, CategoryError>;

    /// Update the fields present in the request
    async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        request: UpdateCategoryRequest,
    ) -> Result<Category, CategoryError>;

    /// Delete a category that no transaction references
    async fn delete_category(&self, user_id: Uuid, category_id: Uuid)
    -> Result<(), CategoryError>;
}

/// Implementation of CategoryService
pub struct CategoryServiceImpl {
    category_repository: Arc<dyn CategoryRepository>,
}

impl CategoryServiceImpl {
    pub fn new(category_repository: Arc<dyn CategoryRepository>) -> Self {
        Self {
            category_repository,
        }
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn get_categories(&self, user_id: Uuid) -> Result<Vec<Category>, CategoryError> {
        Ok(self.category_repository.find_by_user(user_id).await?)
    }

    async fn get_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<Category, CategoryError> {
        self.category_repository
            .find_by_id(user_id, category_id)
            .await?
            .ok_or(CategoryError::CategoryNotFound)
    }

    async fn create_category(
        &self,
        user_id: Uuid,
        request: CreateCategoryRequest,
    ) -> Result<Category, CategoryError> {
        let category = Category::new(
            user_id,
            &request.name,
            request.category_type,
            request.icon.as_deref().unwrap_or_default(),
        );

        Ok(self.category_repository.create(category).await?)
    }

    async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        request: UpdateCategoryRequest,
    ) -> Result<Category, CategoryError> {
        let existing = self.get_category(user_id, category_id).await?;

        let updated = Category {
            name: request.name.unwrap_or(existing.name),
            category_type: request.category_type.unwrap_or(existing.category_type),
            icon: request.icon.unwrap_or(existing.icon),
            ..existing
        };

        Ok(self.category_repository.update(updated).await?)
    }

    async fn delete_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<(), CategoryError> {
        self.category_repository
            .delete(user_id, category_id)
            .await
            .map_err(|e| {
                let error = CategoryError::from(e);
                if matches!(error, CategoryError::CategoryInUse) {
                    tracing::warn!(%user_id, %category_id, "refused to delete a category in use");
                }
                error
            })
    }
}
