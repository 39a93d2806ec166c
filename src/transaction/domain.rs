//! Defines the core data models for transactions.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    category::Category,
    database_id::{CategoryId, TransactionId},
    validation::ValidationError,
};

/// A finite, strictly positive amount of money.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    /// Create an amount.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [ValidationError::InvalidAmount] if `amount` is NaN or infinite,
    /// - or [ValidationError::NonPositiveAmount] if `amount` is zero or negative.
    pub fn new(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            Err(ValidationError::InvalidAmount)
        } else if amount <= 0.0 {
            Err(ValidationError::NonPositiveAmount)
        } else {
            Ok(Self(amount))
        }
    }

    /// The amount as a plain number.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

/// A description of what a transaction was for, with at least two characters once trimmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    /// The fewest characters a description may have once trimmed.
    pub const MIN_LENGTH: usize = 2;

    /// Create a description from `text` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [ValidationError::InvalidDescription] if
    /// the trimmed `text` has fewer than [Description::MIN_LENGTH] characters.
    pub fn new(text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();

        if text.chars().count() < Self::MIN_LENGTH {
            Err(ValidationError::InvalidDescription)
        } else {
            Ok(Self(text.to_string()))
        }
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An expense, i.e. an event where money was spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent in this transaction.
    pub amount: f64,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened. This never changes after creation.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction dated now.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: Amount,
        category_id: CategoryId,
        description: Description,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            category_id,
            description,
            date: OffsetDateTime::now_utc(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The fields are already validated, except that `category_id` is only
/// checked against the categories in the store when the transaction is created.
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// let builder = Transaction::build(
///         Amount::new(4.5)?,
///         category.id,
///         Description::new("Flat white")?,
///     )
///     .date(datetime!(2025-01-15 08:30 UTC));
///
/// let transaction = store.create(builder)?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The amount of money spent.
    pub amount: Amount,

    /// The category the transaction is filed under.
    pub category_id: CategoryId,

    /// A human-readable description of the transaction.
    ///
    /// # Examples
    /// - `"Salary - January 2025"`
    /// - `"Starbucks #1234 - Downtown"`
    pub description: Description,

    /// When the transaction happened.
    ///
    /// Defaults to the time [Transaction::build] was called.
    pub date: OffsetDateTime,
}

impl TransactionBuilder {
    /// Set the date for the transaction.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = date;
        self
    }
}

/// The fields that replace those of an existing transaction.
///
/// There is no date, the date of a transaction is fixed when it is created.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    /// The new amount.
    pub amount: Amount,
    /// The new category.
    pub category_id: CategoryId,
    /// The new description.
    pub description: Description,
}

/// A transaction together with the current state of its category.
///
/// The category is joined in when the transaction is read, so renaming a
/// category is reflected in every transaction read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionWithCategory {
    /// The transaction itself.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The category the transaction belongs to.
    pub category: Category,
}
