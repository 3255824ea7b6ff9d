use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Exact income/expense sums and row count, as computed by the store
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct TransactionTotals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub transaction_count: i64,
}

/// Aggregate totals over a filtered set of transactions
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "total_income": 100.0,
    "total_expense": 50.0,
    "balance": 50.0,
    "transaction_count": 3
}))]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub transaction_count: u64,
}

impl From<TransactionTotals> for TransactionSummary {
    fn from(totals: TransactionTotals) -> Self {
        Self {
            total_income: to_float(totals.total_income),
            total_expense: to_float(totals.total_expense),
            balance: to_float(totals.total_income - totals.total_expense),
            transaction_count: u64::try_from(totals.transaction_count).unwrap_or_default(),
        }
    }
}

/// Summed expense amount for one category name
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({"category": "Comida", "amount": 50.0}))]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

/// Converts an exact amount to the JSON number sent to clients
pub fn to_float(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}
