//! Transactions: amounts of money spent, each filed under one category.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The `TransactionStore` trait and its SQLite implementation
//! - The route handlers for the transaction endpoints

mod domain;
mod handlers;
mod sqlite;
mod store;

pub use domain::{
    Amount, Description, Transaction, TransactionBuilder, TransactionUpdate,
    TransactionWithCategory,
};
pub use handlers::{
    create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    update_transaction_endpoint,
};
pub use sqlite::SQLiteTransactionStore;
pub use store::TransactionStore;

pub(crate) use sqlite::delete_transactions_in_category;
