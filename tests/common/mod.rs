//! In-memory repositories and request helpers for driving the full router
//! without a database.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use finance_tracker::models::{
    Category, CategoryType, Transaction, TransactionFilters, TransactionTotals, User,
};
use finance_tracker::repositories::RepositoryError;
use finance_tracker::repositories::category_repository::CategoryRepository;
use finance_tracker::repositories::transaction_repository::TransactionRepository;
use finance_tracker::repositories::user_repository::UserRepository;
use finance_tracker::services::auth_service::AuthServiceImpl;
use finance_tracker::services::category_service::CategoryServiceImpl;
use finance_tracker::services::transaction_service::TransactionServiceImpl;
use finance_tracker::{AppState, build_router};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    // Insertion sequence breaks ties between equal timestamps
    transactions: HashMap<Uuid, (u64, Transaction)>,
    next_seq: u64,
}

impl Tables {
    fn name_taken(&self, category: &Category) -> bool {
        self.categories.values().any(|c| {
            c.id != category.id && c.user_id == category.user_id && c.name == category.name
        })
    }

    /// Fill in the category columns the way the SQL join does
    fn joined(&self, transaction: &Transaction) -> Option<Transaction> {
        let category = self.categories.get(&transaction.category_id)?;
        Some(Transaction {
            category_name: category.name.clone(),
            category_type: category.category_type,
            ..transaction.clone()
        })
    }

    fn matching(&self, user_id: Uuid, filters: &TransactionFilters) -> Vec<Transaction> {
        let mut rows: Vec<(u64, Transaction)> = self
            .transactions
            .values()
            .filter_map(|(seq, t)| self.joined(t).map(|t| (*seq, t)))
            .filter(|(_, t)| t.user_id == user_id)
            .filter(|(_, t)| filters.category.is_none_or(|id| t.category_id == id))
            .filter(|(_, t)| filters.start_date.is_none_or(|start| t.date >= start))
            .filter(|(_, t)| filters.end_date.is_none_or(|end| t.date <= end))
            .filter(|(_, t)| filters.category_type.is_none_or(|kind| t.category_type == kind))
            .collect();

        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| seq_b.cmp(seq_a))
        });

        rows.into_iter().map(|(_, t)| t).collect()
    }
}

/// Sum amounts by category type the way `SUM ... FILTER` does in SQL
fn tally(transactions: &[Transaction]) -> TransactionTotals {
    transactions
        .iter()
        .fold(TransactionTotals::default(), |mut totals, transaction| {
            match transaction.category_type {
                CategoryType::Income => totals.total_income += transaction.amount,
                CategoryType::Expense => totals.total_expense += transaction.amount,
            }
            totals.transaction_count += 1;
            totals
        })
}

/// One store backing all three repository traits, enforcing the same
/// uniqueness and reference rules as the database schema
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: User, categories: Vec<Category>) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::ConstraintViolation(
                "users_username_key".to_string(),
            ));
        }

        tables.users.insert(user.id, user.clone());
        for category in categories {
            tables.categories.insert(category.id, category);
        }
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create(&self, category: Category) -> Result<Category, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();

        if tables.name_taken(&category) {
            return Err(RepositoryError::ConstraintViolation(
                "categories_name_user_id_key".to_string(),
            ));
        }

        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Category>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .categories
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Category>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update(&self, category: Category) -> Result<Category, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();

        if tables.name_taken(&category) {
            return Err(RepositoryError::ConstraintViolation(
                "categories_name_user_id_key".to_string(),
            ));
        }

        match tables.categories.get_mut(&category.id) {
            Some(existing) if existing.user_id == category.user_id => {
                *existing = category.clone();
                Ok(category)
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();

        match tables.categories.get(&id) {
            Some(c) if c.user_id == user_id => {}
            _ => return Err(RepositoryError::NotFound),
        }

        if tables.transactions.values().any(|(_, t)| t.category_id == id) {
            return Err(RepositoryError::ReferenceViolation(
                "transactions_category_id_fkey".to_string(),
            ));
        }

        tables.categories.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn create(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();

        let created = tables.joined(&transaction).ok_or_else(|| {
            RepositoryError::ReferenceViolation("transactions_category_id_fkey".to_string())
        })?;

        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.transactions.insert(transaction.id, (seq, transaction));
        Ok(created)
    }

    async fn find_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Transaction>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .transactions
            .get(&id)
            .filter(|(_, t)| t.user_id == user_id)
            .and_then(|(_, t)| tables.joined(t)))
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.matching(user_id, filters))
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();

        let updated = Transaction {
            updated_at: Utc::now(),
            ..transaction
        };
        let joined = tables.joined(&updated).ok_or_else(|| {
            RepositoryError::ReferenceViolation("transactions_category_id_fkey".to_string())
        })?;

        match tables.transactions.get_mut(&updated.id) {
            Some((_, existing)) if existing.user_id == updated.user_id => {
                *existing = updated;
                Ok(joined)
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();

        match tables.transactions.get(&id) {
            Some((_, t)) if t.user_id == user_id => {
                tables.transactions.remove(&id);
                Ok(())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    async fn calculate_totals(
        &self,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<TransactionTotals, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tally(&tables.matching(user_id, filters)))
    }
}

/// Build the full application router over the given repositories
pub fn app_with_repositories(
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    transactions: Arc<dyn TransactionRepository>,
) -> Router {
    let state = AppState {
        auth_service: Arc::new(
            AuthServiceImpl::new(users, "test_secret".to_string()).with_hash_cost(4),
        ),
        category_service: Arc::new(CategoryServiceImpl::new(categories.clone())),
        transaction_service: Arc::new(TransactionServiceImpl::new(transactions, categories)),
    };

    build_router(state)
}

/// Build the full application router over a fresh in-memory store
pub fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    app_with_repositories(store.clone(), store.clone(), store)
}

/// Send a request through the router and decode the JSON response body
///
/// Empty bodies decode to `Value::Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, json)
}

/// Register a user and log them in, returning the bearer token
pub async fn register_and_login(app: &Router, username: &str) -> String {
    let credentials = serde_json::json!({
        "username": username,
        "password": "securepassword123",
    });

    let (status, _) = send(
        app,
        Method::POST,
        "/api/register/",
        None,
        Some(credentials.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, Method::POST, "/api/login/", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().unwrap().to_string()
}

/// Look up one of the user's categories by name, returning its id
pub async fn category_id(app: &Router, token: &str, name: &str) -> String {
    let (_, categories) = send(app, Method::GET, "/api/categories/", Some(token), None).await;
    categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .and_then(|c| c["id"].as_str())
        .unwrap()
        .to_string()
}

/// Create a transaction, asserting it was accepted
pub async fn create_transaction(
    app: &Router,
    token: &str,
    category: &str,
    amount: Value,
    date: &str,
) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/transactions/",
        Some(token),
        Some(serde_json::json!({"category": category, "amount": amount, "date": date})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}
