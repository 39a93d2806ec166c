//! Filters for narrowing down the list of transactions.
//!
//! A [TransactionFilter] is built from the query string of
//! `GET /transactions` via [TransactionQuery]. Every constraint is optional
//! and the constraints that are present are combined with AND.

use rusqlite::ToSql;
use serde::Deserialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    database_id::CategoryId, timestamp::DateInput, transaction::Transaction,
    validation::ValidationError,
};

/// Constraints on the transactions to list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only include transactions in this category.
    pub category_id: Option<CategoryId>,
    /// Only include transactions on or after this instant.
    pub start_date: Option<OffsetDateTime>,
    /// Only include transactions on or before this instant.
    pub end_date: Option<OffsetDateTime>,
    /// Only include transactions whose description contains this text, ignoring case.
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Whether `transaction` satisfies every constraint of the filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if self
            .category_id
            .is_some_and(|category_id| category_id != transaction.category_id)
        {
            return false;
        }

        if self.start_date.is_some_and(|start| transaction.date < start) {
            return false;
        }

        if self.end_date.is_some_and(|end| transaction.date > end) {
            return false;
        }

        match self.search_term() {
            Some(term) => transaction.description.to_lowercase().contains(&term),
            None => true,
        }
    }

    /// The SQL `WHERE` clause for the category and date constraints.
    ///
    /// Columns are qualified with the alias `t` for the transaction table.
    /// The search constraint is not included, callers must also check each
    /// row with [TransactionFilter::matches].
    pub(crate) fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = Vec::new();
        let mut parameters: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(category_id) = self.category_id {
            parameters.push(Box::new(category_id));
            conditions.push(format!("t.category_id = ?{}", parameters.len()));
        }

        // Dates are stored in UTC so that they compare correctly as text.
        if let Some(start) = self.start_date {
            parameters.push(Box::new(start.to_offset(UtcOffset::UTC)));
            conditions.push(format!("t.date >= ?{}", parameters.len()));
        }

        if let Some(end) = self.end_date {
            parameters.push(Box::new(end.to_offset(UtcOffset::UTC)));
            conditions.push(format!("t.date <= ?{}", parameters.len()));
        }

        if conditions.is_empty() {
            (String::new(), parameters)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), parameters)
        }
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

/// The raw query string parameters for listing transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    /// The ID of a category.
    pub category_id: Option<String>,
    /// An RFC 3339 timestamp or a `YYYY-MM-DD` date.
    pub start_date: Option<String>,
    /// An RFC 3339 timestamp or a `YYYY-MM-DD` date. A date covers the whole day.
    pub end_date: Option<String>,
    /// Text to look for in the description.
    pub search: Option<String>,
}

impl TryFrom<TransactionQuery> for TransactionFilter {
    type Error = ValidationError;

    /// Parse the query parameters. Blank parameters are ignored.
    fn try_from(query: TransactionQuery) -> Result<Self, Self::Error> {
        let category_id = non_blank(query.category_id)
            .map(|text| {
                text.trim()
                    .parse::<CategoryId>()
                    .map_err(|_| ValidationError::InvalidQueryParameter("categoryId"))
            })
            .transpose()?;

        let start_date = non_blank(query.start_date)
            .map(|text| {
                DateInput::parse(&text)
                    .map(DateInput::start)
                    .ok_or(ValidationError::InvalidQueryParameter("startDate"))
            })
            .transpose()?;

        let end_date = non_blank(query.end_date)
            .map(|text| {
                DateInput::parse(&text)
                    .map(DateInput::end)
                    .ok_or(ValidationError::InvalidQueryParameter("endDate"))
            })
            .transpose()?;

        Ok(Self {
            category_id,
            start_date,
            end_date,
            search: non_blank(query.search),
        })
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod transaction_filter_tests {
    use time::{Duration, macros::datetime};

    use crate::{filter::TransactionFilter, transaction::Transaction};

    fn transaction(category_id: i64, description: &str) -> Transaction {
        Transaction {
            id: 1,
            amount: 4.5,
            category_id,
            description: description.to_owned(),
            date: datetime!(2025-06-15 08:00 UTC),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TransactionFilter::default();

        assert!(filter.matches(&transaction(1, "Coffee")));
        assert_eq!(filter.where_clause().0, "");
    }

    #[test]
    fn category_must_be_equal() {
        let filter = TransactionFilter {
            category_id: Some(1),
            ..Default::default()
        };

        assert!(filter.matches(&transaction(1, "Coffee")));
        assert!(!filter.matches(&transaction(2, "Coffee")));
    }

    #[test]
    fn search_ignores_case() {
        let filter = TransactionFilter {
            search: Some("CoFfEe".to_owned()),
            ..Default::default()
        };

        assert!(filter.matches(&transaction(1, "Iced coffee")));
        assert!(filter.matches(&transaction(1, "COFFEE beans")));
        assert!(!filter.matches(&transaction(1, "Tea")));
    }

    #[test]
    fn search_ignores_case_beyond_ascii() {
        let filter = TransactionFilter {
            search: Some("CAFÉ".to_owned()),
            ..Default::default()
        };

        assert!(filter.matches(&transaction(1, "Corner café")));
    }

    #[test]
    fn blank_search_is_no_constraint() {
        let filter = TransactionFilter {
            search: Some("   ".to_owned()),
            ..Default::default()
        };

        assert!(filter.matches(&transaction(1, "Anything")));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let date = datetime!(2025-06-15 08:00 UTC);
        let filter = TransactionFilter {
            start_date: Some(date),
            end_date: Some(date),
            ..Default::default()
        };

        assert!(filter.matches(&transaction(1, "Coffee")));

        let too_late = TransactionFilter {
            start_date: Some(date + Duration::seconds(1)),
            ..Default::default()
        };
        let too_early = TransactionFilter {
            end_date: Some(date - Duration::seconds(1)),
            ..Default::default()
        };

        assert!(!too_late.matches(&transaction(1, "Coffee")));
        assert!(!too_early.matches(&transaction(1, "Coffee")));
    }

    #[test]
    fn constraints_are_combined() {
        let filter = TransactionFilter {
            category_id: Some(1),
            search: Some("coffee".to_owned()),
            ..Default::default()
        };

        assert!(filter.matches(&transaction(1, "Coffee")));
        assert!(!filter.matches(&transaction(2, "Coffee")));
        assert!(!filter.matches(&transaction(1, "Tea")));
    }

    #[test]
    fn where_clause_numbers_parameters_in_order() {
        let filter = TransactionFilter {
            category_id: Some(3),
            start_date: Some(datetime!(2025-06-01 00:00 UTC)),
            end_date: Some(datetime!(2025-06-30 00:00 UTC)),
            search: Some("ignored in SQL".to_owned()),
        };

        let (clause, parameters) = filter.where_clause();

        assert_eq!(
            clause,
            "WHERE t.category_id = ?1 AND t.date >= ?2 AND t.date <= ?3"
        );
        assert_eq!(parameters.len(), 3);
    }

    #[test]
    fn where_clause_skips_absent_constraints() {
        let filter = TransactionFilter {
            end_date: Some(datetime!(2025-06-30 00:00 UTC)),
            ..Default::default()
        };

        let (clause, parameters) = filter.where_clause();

        assert_eq!(clause, "WHERE t.date <= ?1");
        assert_eq!(parameters.len(), 1);
    }
}
