use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de};
use std::fmt;
use std::str::FromStr;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::models::category::CategoryType;

/// Optional query filters for listing and aggregating transactions
///
/// All present filters are combined with AND. Empty values (`?category=`)
/// are treated as absent.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionFilters {
    /// Exact match on the category id
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<Uuid>,

    /// Inclusive lower bound on the transaction date
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper bound on the transaction date
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub end_date: Option<NaiveDate>,

    /// Type of the referenced category
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    pub category_type: Option<CategoryType>,
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => T::from_str(s).map(Some).map_err(de::Error::custom),
    }
}
