pub mod auth;
pub mod category;
pub mod filters;
pub mod summary;
pub mod transaction;
pub mod user;

pub use auth::{AuthToken, LoginRequest};
pub use category::{
    Category, CategoryType, CreateCategoryRequest, DEFAULT_CATEGORIES, UpdateCategoryRequest,
};
pub use filters::TransactionFilters;
pub use summary::{CategoryAmount, TransactionSummary, TransactionTotals};
pub use transaction::{CreateTransactionRequest, Transaction, UpdateTransactionRequest};
pub use user::{CreateUserRequest, RegisterResponse, User};
