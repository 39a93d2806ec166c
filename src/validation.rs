//! Validation rules for client supplied categories and transactions.
//!
//! The raw request bodies are deserialised into *candidates*, which keep every
//! field optional and loosely typed so that a missing or malformed field can be
//! reported with a useful message instead of a generic deserialisation error.
//! The `parse_*` functions turn a candidate into the typed values that the
//! stores accept, returning the first rule that fails.

use serde::Deserialize;
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    category::{CategoryColor, CategoryName, CategoryUpdate, NewCategory},
    database_id::{CategoryId, DatabaseId},
    timestamp::DateInput,
    transaction::{Amount, Description, Transaction, TransactionBuilder, TransactionUpdate},
};

/// The reasons why client input can be rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The amount was missing, not a number, or not finite.
    #[error("Amount must be a valid number")]
    InvalidAmount,

    /// The amount was zero or negative.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// The category ID was missing or not an integer.
    #[error("Category is required")]
    MissingCategory,

    /// The date was missing or could not be parsed.
    #[error("Date is required and must be valid")]
    InvalidDate,

    /// The description was missing or shorter than two characters once trimmed.
    #[error("Description is required (min 2 characters)")]
    InvalidDescription,

    /// The category name was missing or shorter than two characters once trimmed.
    #[error("Category name is required (min 2 characters)")]
    InvalidCategoryName,

    /// A category update that supplies neither a name nor a colour.
    #[error("At least name or color is required")]
    EmptyCategoryUpdate,

    /// A batch delete without a non-empty list of integer IDs.
    #[error("IDs array is required")]
    InvalidIdList,

    /// The category ID does not refer to an existing category.
    #[error("Category {0} does not exist")]
    UnknownCategory(CategoryId),

    /// An ID in the URL path that is not an integer.
    #[error("Invalid ID \"{0}\"")]
    InvalidId(String),

    /// A query string parameter that could not be parsed.
    #[error("Invalid value for query parameter \"{0}\"")]
    InvalidQueryParameter(&'static str),

    /// The request body was not valid JSON or had the wrong shape.
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    /// The query string could not be read at all.
    #[error("Invalid query string: {0}")]
    MalformedQuery(String),
}

/// Raw transaction fields as sent by a client.
///
/// `amount` and `categoryId` accept both JSON numbers and numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCandidate {
    /// The amount of money, must be positive.
    pub amount: Option<Value>,
    /// The ID of the category the transaction belongs to.
    pub category_id: Option<Value>,
    /// What the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened, RFC 3339 or `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl TransactionCandidate {
    /// Fill in `date` with `now` if the client did not send one.
    pub fn with_default_date(mut self, now: OffsetDateTime) -> Self {
        if non_blank(self.date.as_deref()).is_none() {
            self.date = now.format(&Rfc3339).ok();
        }

        self
    }
}

/// Raw category fields as sent by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryCandidate {
    /// The display name.
    pub name: Option<String>,
    /// The display colour, e.g. "#3b82f6".
    pub color: Option<String>,
}

/// The body of a batch category deletion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchDeleteCandidate {
    /// Should be a non-empty array of category IDs.
    pub ids: Option<Value>,
}

/// Check a transaction candidate against every rule.
///
/// The rules are checked in this order and the first failure is returned:
/// amount is a number, amount is positive, category is present, date is
/// valid, description has at least two characters.
pub fn validate_transaction(candidate: &TransactionCandidate) -> Option<ValidationError> {
    parse_new_transaction(candidate).err()
}

/// Check a category candidate, i.e. that it has a name with at least two characters.
pub fn validate_category(candidate: &CategoryCandidate) -> Option<ValidationError> {
    parse_new_category(candidate).err()
}

/// Validate a candidate for a new transaction.
///
/// # Errors
/// Returns the first [ValidationError] in the order described in [validate_transaction].
pub fn parse_new_transaction(
    candidate: &TransactionCandidate,
) -> Result<TransactionBuilder, ValidationError> {
    let amount = parse_amount(candidate.amount.as_ref())?;
    let category_id = parse_category_id(candidate.category_id.as_ref())?;
    let date = non_blank(candidate.date.as_deref())
        .and_then(DateInput::parse)
        .ok_or(ValidationError::InvalidDate)?
        .start();
    let description = Description::new(candidate.description.as_deref().unwrap_or_default())?;

    Ok(Transaction::build(amount, category_id, description).date(date))
}

/// Validate a candidate that replaces the fields of an existing transaction.
///
/// The date of a transaction cannot be changed, so the date rule is satisfied
/// by the stored date and any `date` in the candidate is ignored.
///
/// # Errors
/// Returns the first [ValidationError] in the order described in [validate_transaction].
pub fn parse_transaction_update(
    candidate: &TransactionCandidate,
) -> Result<TransactionUpdate, ValidationError> {
    let amount = parse_amount(candidate.amount.as_ref())?;
    let category_id = parse_category_id(candidate.category_id.as_ref())?;
    let description = Description::new(candidate.description.as_deref().unwrap_or_default())?;

    Ok(TransactionUpdate {
        amount,
        category_id,
        description,
    })
}

/// Validate a candidate for a new category, defaulting the colour if it is absent.
///
/// # Errors
/// Returns [ValidationError::InvalidCategoryName] if the name is missing or too short.
pub fn parse_new_category(candidate: &CategoryCandidate) -> Result<NewCategory, ValidationError> {
    let name = CategoryName::new(candidate.name.as_deref().unwrap_or_default())?;
    let color = candidate
        .color
        .as_deref()
        .and_then(CategoryColor::new)
        .unwrap_or_default();

    Ok(NewCategory { name, color })
}

/// Validate a partial category update.
///
/// Blank fields count as absent. A name that is present must satisfy the same
/// rule as a new category's name.
///
/// # Errors
/// Returns a:
/// - [ValidationError::InvalidCategoryName] if the name is present but too short,
/// - or [ValidationError::EmptyCategoryUpdate] if neither field is present.
pub fn parse_category_update(
    candidate: &CategoryCandidate,
) -> Result<CategoryUpdate, ValidationError> {
    let name = non_blank(candidate.name.as_deref())
        .map(CategoryName::new)
        .transpose()?;
    let color = candidate.color.as_deref().and_then(CategoryColor::new);

    if name.is_none() && color.is_none() {
        return Err(ValidationError::EmptyCategoryUpdate);
    }

    Ok(CategoryUpdate { name, color })
}

/// Validate the body of a batch deletion, dropping duplicate IDs.
///
/// # Errors
/// Returns [ValidationError::InvalidIdList] unless `ids` is a non-empty array of integers.
pub fn parse_batch_ids(candidate: &BatchDeleteCandidate) -> Result<Vec<CategoryId>, ValidationError> {
    let Some(Value::Array(values)) = &candidate.ids else {
        return Err(ValidationError::InvalidIdList);
    };

    let mut ids = Vec::with_capacity(values.len());

    for value in values {
        let id = value.as_i64().ok_or(ValidationError::InvalidIdList)?;

        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    check_batch_ids(&ids)?;

    Ok(ids)
}

/// Check that a batch of IDs is not empty.
///
/// # Errors
/// Returns [ValidationError::InvalidIdList] if `ids` is empty.
pub fn check_batch_ids(ids: &[CategoryId]) -> Result<(), ValidationError> {
    if ids.is_empty() {
        Err(ValidationError::InvalidIdList)
    } else {
        Ok(())
    }
}

/// Parse an ID taken from the URL path.
///
/// # Errors
/// Returns [ValidationError::InvalidId] if `text` is not an integer.
pub fn parse_id(text: &str) -> Result<DatabaseId, ValidationError> {
    text.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidId(text.to_owned()))
}

fn parse_amount(value: Option<&Value>) -> Result<Amount, ValidationError> {
    let amount = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(ValidationError::InvalidAmount)?;

    Amount::new(amount)
}

// Zero is a valid ID here, it only fails later if no such category exists.
fn parse_category_id(value: Option<&Value>) -> Result<CategoryId, ValidationError> {
    match value {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse::<CategoryId>().ok(),
        _ => None,
    }
    .ok_or(ValidationError::MissingCategory)
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.trim().is_empty())
}


#[cfg(test)]
mod category_validation_tests {
    use serde_json::json;

    use super::{
        BatchDeleteCandidate, CategoryCandidate, ValidationError, parse_batch_ids,
        parse_category_update, parse_id, parse_new_category, validate_category,
    };
    use crate::category::CategoryColor;

    fn candidate(name: Option<&str>, color: Option<&str>) -> CategoryCandidate {
        CategoryCandidate {
            name: name.map(str::to_owned),
            color: color.map(str::to_owned),
        }
    }

    #[test]
    fn name_needs_two_trimmed_characters() {
        for name in [None, Some(""), Some("  "), Some("F"), Some(" F ")] {
            assert_eq!(
                validate_category(&candidate(name, None)),
                Some(ValidationError::InvalidCategoryName),
                "name {name:?} should be rejected"
            );
        }

        assert_eq!(validate_category(&candidate(Some("Fo"), None)), None);
    }

    #[test]
    fn new_category_defaults_color() {
        let new_category = parse_new_category(&candidate(Some(" Food "), Some("  ")))
            .expect("Could not parse category");

        assert_eq!(new_category.name.as_ref(), "Food");
        assert_eq!(new_category.color, CategoryColor::default());
    }

    #[test]
    fn new_category_keeps_color() {
        let new_category = parse_new_category(&candidate(Some("Food"), Some("#ff0000")))
            .expect("Could not parse category");

        assert_eq!(new_category.color.as_ref(), "#ff0000");
    }

    #[test]
    fn update_needs_name_or_color() {
        for (name, color) in [(None, None), (Some(""), Some(" ")), (Some("\t"), None)] {
            assert_eq!(
                parse_category_update(&candidate(name, color)),
                Err(ValidationError::EmptyCategoryUpdate)
            );
        }
    }

    #[test]
    fn update_with_only_name() {
        let update =
            parse_category_update(&candidate(Some("Groceries"), None)).expect("Could not parse");

        assert_eq!(update.name.unwrap().as_ref(), "Groceries");
        assert_eq!(update.color, None);
    }

    #[test]
    fn update_with_short_name_fails() {
        assert_eq!(
            parse_category_update(&candidate(Some("A"), Some("#000000"))),
            Err(ValidationError::InvalidCategoryName)
        );
    }

    #[test]
    fn batch_ids_must_be_non_empty_integer_array() {
        for ids in [None, Some(json!([])), Some(json!("1,2")), Some(json!([1, "2"]))] {
            assert_eq!(
                parse_batch_ids(&BatchDeleteCandidate { ids }),
                Err(ValidationError::InvalidIdList)
            );
        }
    }

    #[test]
    fn batch_ids_drop_duplicates() {
        let ids = parse_batch_ids(&BatchDeleteCandidate {
            ids: Some(json!([3, 1, 3])),
        });

        assert_eq!(ids, Ok(vec![3, 1]));
    }

    #[test]
    fn path_ids_must_be_integers() {
        assert_eq!(parse_id("42"), Ok(42));
        assert_eq!(
            parse_id("abc"),
            Err(ValidationError::InvalidId("abc".to_owned()))
        );
        assert_eq!(
            parse_id("1.5"),
            Err(ValidationError::InvalidId("1.5".to_owned()))
        );
    }
}
