//! Defines the transaction store trait.

use crate::{
    Error,
    database_id::TransactionId,
    filter::TransactionFilter,
    transaction::{TransactionBuilder, TransactionUpdate, TransactionWithCategory},
};

/// Handles the creation, retrieval, update and deletion of transactions.
///
/// Every transaction refers to a category by ID. Implementers must check
/// that the category exists whenever a transaction is created or moved to
/// another category, and must return transactions joined with the current
/// state of their category.
///
/// There is deliberately no way to delete the transactions of a category
/// here, that only happens as part of deleting the category through
/// [CategoryStore::delete](crate::category::CategoryStore::delete).
pub trait TransactionStore {
    /// Retrieve the transactions matching `filter`, newest first.
    fn list(&self, filter: &TransactionFilter) -> Result<Vec<TransactionWithCategory>, Error>;

    /// Retrieve a transaction by its ID.
    fn get(&self, id: TransactionId) -> Result<TransactionWithCategory, Error>;

    /// Create a new transaction in the store.
    fn create(&self, builder: TransactionBuilder) -> Result<TransactionWithCategory, Error>;

    /// Replace the amount, category and description of a transaction.
    fn update(
        &self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<TransactionWithCategory, Error>;

    /// Delete a transaction.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;
}
