use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::filters::TransactionFilters;
use crate::models::summary::TransactionTotals;
use crate::models::transaction::Transaction;
use crate::repositories::RepositoryError;

/// Columns of a transaction joined with its category
const TRANSACTION_COLUMNS: &str = r#"
    t.id, t.user_id, t.category_id,
    c.name AS category_name, c.category_type,
    t.amount, t.description, t.date, t.created_at, t.updated_at
"#;

/// Trait defining transaction repository operations
///
/// Every lookup is scoped to the owning user.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Create a new transaction
    async fn create(&self, transaction: Transaction) -> Result<Transaction, RepositoryError>;

    /// Find a transaction by ID among the user's transactions
    async fn find_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Transaction>, RepositoryError>;

    /// Find the user's transactions matching the filters, most recent date first,
    /// then most recently created first
    async fn find_by_user(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, RepositoryError>;

    /// Overwrite category, amount, description and date; refreshes `updated_at`
    async fn update(&self, transaction: Transaction) -> Result<Transaction, RepositoryError>;

    /// Delete a transaction
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError>;

    /// Sum income and expense amounts and count the rows matching the filters
    async fn calculate_totals(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<TransactionTotals, RepositoryError>;
}

/// PostgreSQL implementation of TransactionRepository
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends `AND` conditions for every filter that is set
fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filters: &TransactionFilters) {
    if let Some(category_id) = filters.category {
        query.push(" AND t.category_id = ").push_bind(category_id);
    }

    if let Some(start_date) = filters.start_date {
        query.push(" AND t.date >= ").push_bind(start_date);
    }

    if let Some(end_date) = filters.end_date {
        query.push(" AND t.date <= ").push_bind(end_date);
    }

    if let Some(category_type) = filters.category_type {
        query
            .push(" AND c.category_type = ")
            .push_bind(category_type.as_str());
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let query = format!(
            r#"
            WITH t AS (
                INSERT INTO transactions (
                    id, user_id, category_id, amount,
                    description, date, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            SELECT {TRANSACTION_COLUMNS}
            FROM t
            JOIN categories c ON c.id = t.category_id
            "#
        );

        let created = sqlx::query_as::<_, Transaction>(&query)
            .bind(transaction.id)
            .bind(transaction.user_id)
            .bind(transaction.category_id)
            .bind(transaction.amount)
            .bind(&transaction.description)
            .bind(transaction.date)
            .bind(transaction.created_at)
            .bind(transaction.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Transaction>, RepositoryError> {
        let query = format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.id = $1 AND t.user_id = $2
            "#
        );

        let transaction = sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(transaction)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = "#
        ));
        query.push_bind(user_id);

        push_filters(&mut query, filters);

        query.push(" ORDER BY t.date DESC, t.created_at DESC");

        let transactions = query
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await?;

        Ok(transactions)
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let query = format!(
            r#"
            WITH t AS (
                UPDATE transactions
                SET category_id = $3,
                    amount = $4,
                    description = $5,
                    date = $6,
                    updated_at = NOW()
                WHERE id = $1 AND user_id = $2
                RETURNING *
            )
            SELECT {TRANSACTION_COLUMNS}
            FROM t
            JOIN categories c ON c.id = t.category_id
            "#
        );

        let updated = sqlx::query_as::<_, Transaction>(&query)
            .bind(transaction.id)
            .bind(transaction.user_id)
            .bind(transaction.category_id)
            .bind(transaction.amount)
            .bind(&transaction.description)
            .bind(transaction.date)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM transactions
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

    async fn calculate_totals(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<TransactionTotals, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                COALESCE(SUM(t.amount) FILTER (WHERE c.category_type = 'income'), 0) AS total_income,
                COALESCE(SUM(t.amount) FILTER (WHERE c.category_type = 'expense'), 0) AS total_expense,
                COUNT(*) AS transaction_count
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = "#,
        );
        query.push_bind(user_id);

        push_filters(&mut query, filters);

        let totals = query
            .build_query_as::<TransactionTotals>()
            .fetch_one(&self.pool)
            .await?;

        Ok(totals)
    }
}
