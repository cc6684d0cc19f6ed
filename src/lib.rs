// Fintrack - Core Library
// Exposes the expense schema, storage and (with the `server` feature) the HTTP API

pub mod db;
pub mod schema;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod error;

// Re-export commonly used types
pub use db::{
    Database, Session, Expense, NewExpense,
    setup_database, insert_expense, list_expenses, get_expense,
    update_expense, delete_expense, count_expenses,
};
pub use schema::{
    ExpenseInput, ExpenseUpdate, ExpenseOutput, ListParams,
    Message, RootStatus, ErrorDetail,
};

#[cfg(feature = "server")]
pub use api::{router, AppState};
#[cfg(feature = "server")]
pub use config::ServerConfig;
#[cfg(feature = "server")]
pub use error::{ApiError, ApiResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
