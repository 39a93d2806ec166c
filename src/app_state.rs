//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, category::SQLiteCategoryStore, db::initialize, transaction::SQLiteTransactionStore,
};

/// The state of the REST server.
///
/// The stores are generic so that route handlers can be tested against
/// stores that fail on demand.
#[derive(Debug, Clone)]
pub struct AppState<C, T> {
    /// The store for managing [categories](crate::category::Category).
    pub category_store: C,

    /// The store for managing [transactions](crate::transaction::Transaction).
    pub transaction_store: T,
}

impl<C, T> AppState<C, T> {
    /// Create a new [AppState] from its stores.
    pub fn new(category_store: C, transaction_store: T) -> Self {
        Self {
            category_store,
            transaction_store,
        }
    }
}

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteCategoryStore, SQLiteTransactionStore>;

/// Create an [AppState] where both stores share one SQLite connection.
///
/// This function will initialize the database by adding the tables for the domain models.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(db_connection: Connection) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        SQLiteCategoryStore::new(connection.clone()),
        SQLiteTransactionStore::new(connection),
    ))
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use crate::{
        category::CategoryStore, create_app_state, filter::TransactionFilter,
        test_utils::create_test_category, transaction::TransactionStore,
    };

    #[test]
    fn stores_share_one_database() {
        let connection = Connection::open_in_memory().unwrap();
        let state = create_app_state(connection).expect("Could not create app state");

        let category = create_test_category(&state.category_store, "Food");

        assert_eq!(state.category_store.list().unwrap(), vec![category]);
        assert!(
            state
                .transaction_store
                .list(&TransactionFilter::default())
                .unwrap()
                .is_empty()
        );
    }
}
