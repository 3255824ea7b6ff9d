//! Personal finance tracker: users keep income and expense categories, record
//! dated transactions against them and query totals over filtered sets.

pub mod config;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod validation;

pub use config::{Config, ConfigError};
pub use routes::{AppState, build_router};
