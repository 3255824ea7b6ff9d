use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::category::{Category, CategoryType};
use crate::models::filters::TransactionFilters;
use crate::models::summary::{CategoryAmount, TransactionSummary, to_float};
use crate::models::transaction::{
    CreateTransactionRequest, Transaction, UpdateTransactionRequest,
};
use crate::repositories::RepositoryError;
use crate::repositories::category_repository::CategoryRepository;
use crate::repositories::transaction_repository::TransactionRepository;

/// Transaction service errors
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Invalid category - object does not exist.")]
    InvalidCategory,

    #[error("Transaction not found")]
    TransactionNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<RepositoryError> for TransactionError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => TransactionError::TransactionNotFound,
            RepositoryError::ReferenceViolation(_) => TransactionError::InvalidCategory,
            e => TransactionError::DatabaseError(e.to_string()),
        }
    }
}

/// Trait defining transaction service operations
///
/// Every operation runs on behalf of `user_id` and only sees that user's transactions.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Record a transaction in one of the user's categories
    async fn create_transaction(
        &self,
        user_id: Uuid,
        request: CreateTransactionRequest,
    ) -> Result<Transaction, TransactionError>;

    /// List the user's transactions matching the filters, newest first
    async fn get_transactions(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, TransactionError>;

    /// Get one of the user's transactions
    async fn get_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Transaction, TransactionError>;

    /// Update the fields present in the request
    async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        request: UpdateTransactionRequest,
    ) -> Result<Transaction, TransactionError>;

    /// Delete one of the user's transactions
    async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), TransactionError>;

    /// Income, expense, balance and count over the filtered transactions
    async fn get_summary(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<TransactionSummary, TransactionError>;

    /// Expense totals per category name over the filtered transactions
    async fn get_by_category(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<Vec<CategoryAmount>, TransactionError>;
}

/// Sums expense amounts per category name
///
/// Groups appear in the order their first transaction is encountered.
/// Income transactions are skipped whatever filter produced the input.
pub fn breakdown_by_category(transactions: &[Transaction]) -> Vec<CategoryAmount> {
    let mut totals: Vec<(&str, Decimal)> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.category_type == CategoryType::Expense)
    {
        match totals
            .iter_mut()
            .find(|(name, _)| *name == transaction.category_name)
        {
            Some((_, total)) => *total += transaction.amount,
            None => totals.push((transaction.category_name.as_str(), transaction.amount)),
        }
    }

    totals
        .into_iter()
        .map(|(name, total)| CategoryAmount {
            category: name.to_string(),
            amount: to_float(total),
        })
        .collect()
}

/// Implementation of TransactionService
pub struct TransactionServiceImpl {
    transaction_repository: Arc<dyn TransactionRepository>,
    category_repository: Arc<dyn CategoryRepository>,
}

impl TransactionServiceImpl {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepository>,
        category_repository: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            transaction_repository,
            category_repository,
        }
    }

    /// Resolve a category id among the user's own categories
    async fn owned_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<Category, TransactionError> {
        self.category_repository
            .find_by_id(user_id, category_id)
            .await?
            .ok_or(TransactionError::InvalidCategory)
    }
}

#[async_trait]
impl TransactionService for TransactionServiceImpl {
    async fn create_transaction(
        &self,
        user_id: Uuid,
        request: CreateTransactionRequest,
    ) -> Result<Transaction, TransactionError> {
        let category = self.owned_category(user_id, request.category).await?;

        let now = Utc::now();
        let transaction = Transaction {
            id: Uuid::new_v4(),
            user_id,
            category_id: category.id,
            category_name: category.name,
            category_type: category.category_type,
            amount: request.amount,
            description: request.description.unwrap_or_default(),
            date: request.date,
            created_at: now,
            updated_at: now,
        };

        Ok(self.transaction_repository.create(transaction).await?)
    }

    async fn get_transactions(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, TransactionError> {
        Ok(self
            .transaction_repository
            .find_by_user(user_id, filters)
            .await?)
    }

    async fn get_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Transaction, TransactionError> {
        self.transaction_repository
            .find_by_id(user_id, transaction_id)
            .await?
            .ok_or(TransactionError::TransactionNotFound)
    }

    async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        request: UpdateTransactionRequest,
    ) -> Result<Transaction, TransactionError> {
        let existing = self.get_transaction(user_id, transaction_id).await?;

        let (category_id, category_name, category_type) = match request.category {
            Some(category_id) if category_id != existing.category_id => {
                let category = self.owned_category(user_id, category_id).await?;
                (category.id, category.name, category.category_type)
            }
            _ => (
                existing.category_id,
                existing.category_name,
                existing.category_type,
            ),
        };

        let updated = Transaction {
            category_id,
            category_name,
            category_type,
            amount: request.amount.unwrap_or(existing.amount),
            description: request.description.unwrap_or(existing.description),
            date: request.date.unwrap_or(existing.date),
            updated_at: Utc::now(),
            ..existing
        };

        Ok(self.transaction_repository.update(updated).await?)
    }

    async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), TransactionError> {
        Ok(self
            .transaction_repository
            .delete(user_id, transaction_id)
            .await?)
    }

    async fn get_summary(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<TransactionSummary, TransactionError> {
        let totals = self
            .transaction_repository
            .calculate_totals(user_id, filters)
            .await?;

        Ok(TransactionSummary::from(totals))
    }

    async fn get_by_category(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<Vec<CategoryAmount>, TransactionError> {
        let transactions = self
            .transaction_repository
            .find_by_user(user_id, filters)
            .await?;

        Ok(breakdown_by_category(&transactions))
    }
}
