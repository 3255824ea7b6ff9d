use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::category::CategoryType;
use crate::validation::validate_amount;

/// A single dated income or expense record
///
/// `category_name` and `category_type` are read from the referenced category
/// whenever a transaction is loaded.
#[derive(Debug, Clone, Serialize, ToSchema, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    #[serde(rename = "category")]
    pub category_id: Uuid,
    pub category_name: String,
    #[sqlx(try_from = "String")]
    pub category_type: CategoryType,
    #[schema(value_type = String, example = "42.50")]
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a transaction, also used for full updates
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "category": "550e8400-e29b-41d4-a716-446655440000",
    "amount": 42.50,
    "date": "2024-01-15",
    "description": "Weekly groceries"
}))]
pub struct CreateTransactionRequest {
    pub category: Uuid,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = f64, minimum = 0.01, example = 42.50)]
    pub amount: Decimal,

    #[schema(format = "date", example = "2024-01-15")]
    pub date: NaiveDate,

    pub description: Option<String>,
}

/// Request payload for partially updating a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "amount": 45.00,
    "date": "2024-01-16"
}))]
pub struct UpdateTransactionRequest {
    pub category: Option<Uuid>,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = Option<f64>, minimum = 0.01, example = 45.00)]
    pub amount: Option<Decimal>,

    #[schema(format = "date", example = "2024-01-16")]
    pub date: Option<NaiveDate>,

    pub description: Option<String>,
}

impl From<CreateTransactionRequest> for UpdateTransactionRequest {
    fn from(request: CreateTransactionRequest) -> Self {
        Self {
            category: Some(request.category),
            amount: Some(request.amount),
            date: Some(request.date),
            description: request.description,
        }
    }
}
