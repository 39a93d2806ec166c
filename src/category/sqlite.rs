//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, Transaction as SqlTransaction};

use crate::{
    Error,
    category::{
        BatchDeletion, Category, CategoryColor, CategoryName, CategoryStore, CategoryUpdate,
        NewCategory,
    },
    database_id::CategoryId,
    db::{CreateTable, MapRow, lock},
    transaction::delete_transactions_in_category,
    validation::check_batch_ids,
};

/// Creates, retrieves and deletes categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Retrieve all categories ordered alphabetically by name.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn list(&self) -> Result<Vec<Category>, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, color FROM category ORDER BY name ASC, id ASC;")?
            .query_map([], Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    /// Retrieve a single category by ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: CategoryId) -> Result<Category, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, color FROM category WHERE id = :id;")?
            .query_row(&[(":id", &id)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Create a category and return it with its generated ID.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&self, new_category: NewCategory) -> Result<Category, Error> {
        let category = lock(&self.connection)?
            .prepare("INSERT INTO category (name, color) VALUES (?1, ?2) RETURNING id, name, color;")?
            .query_row(
                (new_category.name.as_ref(), new_category.color.as_ref()),
                Self::map_row,
            )?;

        tracing::debug!("created category {}", category.id);

        Ok(category)
    }

    /// Update the supplied fields of a category.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingCategory] if `id` does not refer to a category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category, Error> {
        let name: Option<&str> = update.name.as_ref().map(|name| name.as_ref());
        let color: Option<&str> = update.color.as_ref().map(|color| color.as_ref());

        lock(&self.connection)?
            .prepare(
                "UPDATE category SET name = COALESCE(?1, name), color = COALESCE(?2, color)
                 WHERE id = ?3
                 RETURNING id, name, color;",
            )?
            .query_row((name, color, id), Self::map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingCategory,
                error => error.into(),
            })
    }

    /// Delete a category and its transactions in one database transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingCategory] if `id` does not refer to a category,
    /// - or [Error::SqlError] if there is some other SQL error, in which case nothing is deleted.
    fn delete(&self, id: CategoryId) -> Result<(), Error> {
        let mut connection = lock(&self.connection)?;
        let transaction = connection.transaction()?;

        if !delete_with_transactions(id, &transaction)? {
            return Err(Error::DeleteMissingCategory);
        }

        transaction.commit()?;

        Ok(())
    }

    /// Delete categories one at a time, each in its own database transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [ValidationError::InvalidIdList](crate::validation::ValidationError::InvalidIdList) if `ids` is empty,
    /// - or [Error::SqlError] if there is an SQL error. Categories processed
    ///   before the error remain deleted.
    fn delete_batch(&self, ids: &[CategoryId]) -> Result<BatchDeletion, Error> {
        check_batch_ids(ids)?;

        let mut connection = lock(&self.connection)?;
        let mut deletion = BatchDeletion::default();

        for &id in ids {
            let transaction = connection.transaction()?;

            if delete_with_transactions(id, &transaction)? {
                transaction.commit()?;
                deletion.deleted.push(id);
            } else {
                deletion.missing.push(id);
            }
        }

        tracing::debug!(
            "batch deleted {} categories, {} missing",
            deletion.deleted.len(),
            deletion.missing.len()
        );

        Ok(deletion)
    }
}

/// Delete the transactions of category `id` and then the category itself.
///
/// Returns `false` if there was no such category. The caller decides whether
/// to commit `transaction`.
fn delete_with_transactions(id: CategoryId, transaction: &SqlTransaction) -> Result<bool, Error> {
    let deleted_transactions = delete_transactions_in_category(id, transaction)?;
    let rows_affected = transaction.execute("DELETE FROM category WHERE id = ?1", [id])?;

    if rows_affected > 0 {
        tracing::debug!("deleted category {id} and {deleted_transactions} of its transactions");
    }

    Ok(rows_affected > 0)
}

/// Check whether `id` refers to an existing category.
pub(crate) fn category_exists(id: CategoryId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM category WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                color TEXT NOT NULL DEFAULT '#3b82f6'
            );

            CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
        )
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_name: String = row.get(offset + 1)?;
        let raw_color: String = row.get(offset + 2)?;

        Ok(Category {
            id,
            name: CategoryName::new_unchecked(&raw_name),
            color: CategoryColor::new_unchecked(&raw_color),
        })
    }
}
