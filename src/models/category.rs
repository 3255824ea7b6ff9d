use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Categories created for every newly registered user, in creation order
pub const DEFAULT_CATEGORIES: &[(&str, CategoryType)] = &[
    ("Salario", CategoryType::Income),
    ("Freelance", CategoryType::Income),
    ("Alquiler", CategoryType::Expense),
    ("Comida", CategoryType::Expense),
    ("Transporte", CategoryType::Expense),
    ("Ocio", CategoryType::Expense),
];

/// Whether money in a category comes in or goes out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    /// Value stored in the `category_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("'{0}' is not a valid category type, expected 'income' or 'expense'")]
pub struct UnknownCategoryType(pub String);

impl FromStr for CategoryType {
    type Err = UnknownCategoryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            other => Err(UnknownCategoryType(other.to_string())),
        }
    }
}

impl TryFrom<String> for CategoryType {
    type Error = UnknownCategoryType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Category entity classifying a user's transactions as income or expense
#[derive(Debug, Clone, Serialize, ToSchema, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub category_type: CategoryType,
    pub icon: String,
    /// Owner of the category; always the authenticated user, so not serialized
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(user_id: Uuid, name: &str, category_type: CategoryType, icon: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category_type,
            icon: icon.to_string(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|value| value.trim().to_string())
}

fn trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|value| value.map(|value| value.trim().to_string()))
}

/// Request payload for creating a category, also used for full updates
///
/// Name and icon are trimmed as they are read.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Gimnasio",
    "type": "expense",
    "icon": "dumbbell"
}))]
pub struct CreateCategoryRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,

    #[serde(rename = "type")]
    pub category_type: CategoryType,

    #[validate(length(max = 50, message = "Icon must be at most 50 characters"))]
    #[serde(default, deserialize_with = "trimmed_option")]
    pub icon: Option<String>,
}

/// Request payload for partially updating a category
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Supermercado"
}))]
pub struct UpdateCategoryRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    #[serde(default, deserialize_with = "trimmed_option")]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,

    #[validate(length(max = 50, message = "Icon must be at most 50 characters"))]
    #[serde(default, deserialize_with = "trimmed_option")]
    pub icon: Option<String>,
}

impl From<CreateCategoryRequest> for UpdateCategoryRequest {
    fn from(request: CreateCategoryRequest) -> Self {
        Self {
            name: Some(request.name),
            category_type: Some(request.category_type),
            icon: request.icon,
        }
    }
}
