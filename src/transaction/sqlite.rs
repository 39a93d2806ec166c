//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, Transaction as SqlTransaction, params_from_iter};
use time::UtcOffset;

use crate::{
    Error,
    category::{SQLiteCategoryStore, category_exists},
    database_id::{CategoryId, TransactionId},
    db::{CreateTable, MapRow, lock},
    filter::TransactionFilter,
    transaction::{
        Transaction, TransactionBuilder, TransactionStore, TransactionUpdate,
        TransactionWithCategory,
    },
    validation::ValidationError,
};

const SELECT_WITH_CATEGORY: &str = "SELECT t.id, t.amount, t.category_id, t.description, t.date, \
    c.id, c.name, c.color \
    FROM \"transaction\" t INNER JOIN category c ON t.category_id = c.id";

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the
/// [Category](crate::category::Category) model, the category table must be
/// set up in the database, see [initialize_db](crate::initialize_db).
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Query for transactions in the database.
    ///
    /// The category and date constraints of `filter` are applied in SQL, then
    /// the full filter is applied to the rows so that text search uses the
    /// same case folding as [TransactionFilter::matches].
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is a SQL error.
    fn list(&self, filter: &TransactionFilter) -> Result<Vec<TransactionWithCategory>, Error> {
        let (where_clause, parameters) = filter.where_clause();

        // Sort by date, and then ID to keep transaction order stable after updates
        let query = format!("{SELECT_WITH_CATEGORY} {where_clause} ORDER BY t.date DESC, t.id DESC");

        let mut transactions = lock(&self.connection)?
            .prepare(&query)?
            .query_map(params_from_iter(parameters.iter()), map_row_with_category)?
            .collect::<Result<Vec<_>, _>>()?;

        transactions.retain(|row| filter.matches(&row.transaction));

        Ok(transactions)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<TransactionWithCategory, Error> {
        let connection = lock(&self.connection)?;

        get_with_category(id, &connection)
    }

    /// Create a new transaction in the database.
    ///
    /// The date is stored in UTC.
    ///
    /// # Errors
    /// This function will return a:
    /// - [ValidationError::UnknownCategory] if the category ID does not refer to a category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, builder: TransactionBuilder) -> Result<TransactionWithCategory, Error> {
        let connection = lock(&self.connection)?;
        let category_id = builder.category_id;

        ensure_category_exists(category_id, &connection)?;

        let id: TransactionId = connection
            .prepare(
                "INSERT INTO \"transaction\" (amount, category_id, description, date)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id",
            )?
            .query_row(
                (
                    builder.amount.as_f64(),
                    category_id,
                    builder.description.as_ref(),
                    builder.date.to_offset(UtcOffset::UTC),
                ),
                |row| row.get(0),
            )
            .map_err(|error| map_foreign_key_error(error, category_id))?;

        tracing::debug!("created transaction {id} in category {category_id}");

        get_with_category(id, &connection)
    }

    /// Replace the amount, category and description of a transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction,
    /// - [ValidationError::UnknownCategory] if the new category does not exist,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<TransactionWithCategory, Error> {
        let connection = lock(&self.connection)?;

        let exists: bool = connection.query_row(
            "SELECT EXISTS(SELECT 1 FROM \"transaction\" WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;

        if !exists {
            return Err(Error::UpdateMissingTransaction);
        }

        ensure_category_exists(update.category_id, &connection)?;

        connection
            .execute(
                "UPDATE \"transaction\" SET amount = ?1, category_id = ?2, description = ?3 WHERE id = ?4",
                (
                    update.amount.as_f64(),
                    update.category_id,
                    update.description.as_ref(),
                    id,
                ),
            )
            .map_err(|error| map_foreign_key_error(error, update.category_id))?;

        get_with_category(id, &connection)
    }

    /// Delete a transaction by ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let rows_affected = lock(&self.connection)?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }
}

/// Delete every transaction in the category `category_id`.
///
/// Only the category store may call this, as the first half of deleting a
/// category inside `transaction`.
pub(crate) fn delete_transactions_in_category(
    category_id: CategoryId,
    transaction: &SqlTransaction,
) -> Result<usize, Error> {
    transaction
        .execute(
            "DELETE FROM \"transaction\" WHERE category_id = ?1",
            [category_id],
        )
        .map_err(|error| error.into())
}

fn get_with_category(
    id: TransactionId,
    connection: &Connection,
) -> Result<TransactionWithCategory, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_WITH_CATEGORY} WHERE t.id = :id"))?
        .query_row(&[(":id", &id)], map_row_with_category)?;

    Ok(transaction)
}

fn ensure_category_exists(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    if category_exists(category_id, connection)? {
        Ok(())
    } else {
        Err(ValidationError::UnknownCategory(category_id).into())
    }
}

fn map_foreign_key_error(error: rusqlite::Error, category_id: CategoryId) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => ValidationError::UnknownCategory(category_id).into(),
        error => error.into(),
    }
}

fn map_row_with_category(row: &Row) -> Result<TransactionWithCategory, rusqlite::Error> {
    let transaction = SQLiteTransactionStore::map_row(row)?;
    let category = SQLiteCategoryStore::map_row_with_offset(row, 5)?;

    Ok(TransactionWithCategory {
        transaction,
        category,
    })
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                category_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_category_date ON \"transaction\"(category_id, date);",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            amount: row.get(offset + 1)?,
            category_id: row.get(offset + 2)?,
            description: row.get(offset + 3)?,
            date: row.get(offset + 4)?,
        })
    }
}
