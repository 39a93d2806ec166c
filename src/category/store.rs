//! Defines the category store trait.

use crate::{
    Error,
    category::{BatchDeletion, Category, CategoryUpdate, NewCategory},
    database_id::CategoryId,
};

/// Creates, retrieves, updates and deletes categories.
///
/// A store owns the lifetime of its categories. Because every transaction
/// must belong to a category, deleting a category also deletes its
/// transactions as a single unit.
pub trait CategoryStore {
    /// Retrieve all categories ordered by name.
    fn list(&self) -> Result<Vec<Category>, Error>;

    /// Retrieve a category by its ID.
    fn get(&self, id: CategoryId) -> Result<Category, Error>;

    /// Create a new category and add it to the store.
    fn create(&self, new_category: NewCategory) -> Result<Category, Error>;

    /// Change the fields given in `update`, leaving the others as they are.
    fn update(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category, Error>;

    /// Delete a category and all of its transactions.
    ///
    /// Either both the category and its transactions are removed, or nothing is.
    fn delete(&self, id: CategoryId) -> Result<(), Error>;

    /// Delete several categories and their transactions.
    ///
    /// Each category is deleted as in [CategoryStore::delete]. IDs that do
    /// not refer to a category are reported in [BatchDeletion::missing].
    /// The batch as a whole is not atomic: if an error stops the batch, the
    /// categories deleted before the error stay deleted.
    ///
    /// An empty `ids` is rejected with
    /// [ValidationError::InvalidIdList](crate::validation::ValidationError::InvalidIdList).
    fn delete_batch(&self, ids: &[CategoryId]) -> Result<BatchDeletion, Error>;
}
