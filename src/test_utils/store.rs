use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    category::{
        BatchDeletion, Category, CategoryColor, CategoryName, CategoryStore, CategoryUpdate,
        NewCategory, SQLiteCategoryStore,
    },
    database_id::{CategoryId, TransactionId},
    db::initialize,
    filter::TransactionFilter,
    transaction::{
        Amount, Description, SQLiteTransactionStore, Transaction, TransactionBuilder,
        TransactionStore, TransactionUpdate, TransactionWithCategory,
    },
};

/// Create both stores on one fresh in-memory database.
#[track_caller]
pub(crate) fn get_test_stores() -> (SQLiteCategoryStore, SQLiteTransactionStore) {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    let connection = Arc::new(Mutex::new(connection));

    (
        SQLiteCategoryStore::new(connection.clone()),
        SQLiteTransactionStore::new(connection),
    )
}

#[track_caller]
pub(crate) fn create_test_category(store: &impl CategoryStore, name: &str) -> Category {
    store
        .create(NewCategory {
            name: CategoryName::new_unchecked(name),
            color: CategoryColor::default(),
        })
        .expect("Could not create test category")
}

#[track_caller]
pub(crate) fn create_test_transaction(
    store: &impl TransactionStore,
    category_id: CategoryId,
    amount: f64,
    description: &str,
) -> TransactionWithCategory {
    store
        .create(Transaction::build(
            Amount::new(amount).expect("Invalid test amount"),
            category_id,
            Description::new(description).expect("Invalid test description"),
        ))
        .expect("Could not create test transaction")
}

/// A store where every operation fails as if the database were unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FailingStore;

impl CategoryStore for FailingStore {
    fn list(&self) -> Result<Vec<Category>, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get(&self, _id: CategoryId) -> Result<Category, Error> {
        Err(Error::DatabaseLockError)
    }

    fn create(&self, _new_category: NewCategory) -> Result<Category, Error> {
        Err(Error::DatabaseLockError)
    }

    fn update(&self, _id: CategoryId, _update: CategoryUpdate) -> Result<Category, Error> {
        Err(Error::DatabaseLockError)
    }

    fn delete(&self, _id: CategoryId) -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }

    fn delete_batch(&self, _ids: &[CategoryId]) -> Result<BatchDeletion, Error> {
        Err(Error::DatabaseLockError)
    }
}

impl TransactionStore for FailingStore {
    fn list(&self, _filter: &TransactionFilter) -> Result<Vec<TransactionWithCategory>, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get(&self, _id: TransactionId) -> Result<TransactionWithCategory, Error> {
        Err(Error::DatabaseLockError)
    }

    fn create(&self, _builder: TransactionBuilder) -> Result<TransactionWithCategory, Error> {
        Err(Error::DatabaseLockError)
    }

    fn update(
        &self,
        _id: TransactionId,
        _update: TransactionUpdate,
    ) -> Result<TransactionWithCategory, Error> {
        Err(Error::DatabaseLockError)
    }

    fn delete(&self, _id: TransactionId) -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }
}
