//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{database_id::CategoryId, validation::ValidationError};

/// A validated category name with at least two characters, stored trimmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// The fewest characters a name may have once trimmed.
    pub const MIN_LENGTH: usize = 2;

    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [ValidationError::InvalidCategoryName] if
    /// the trimmed `name` has fewer than [CategoryName::MIN_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();

        if name.chars().count() < Self::MIN_LENGTH {
            Err(ValidationError::InvalidCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is a valid name.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The colour used to display a category, e.g. "#3b82f6".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryColor(String);

impl CategoryColor {
    /// The colour given to categories created without one.
    pub const DEFAULT: &str = "#3b82f6";

    /// Create a colour from `color` with surrounding whitespace removed.
    ///
    /// Returns `None` for blank strings, which callers treat as "no colour given".
    pub fn new(color: &str) -> Option<Self> {
        let color = color.trim();

        if color.is_empty() {
            None
        } else {
            Some(Self(color.to_string()))
        }
    }

    /// Create a colour without validation.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_string())
    }
}

impl Default for CategoryColor {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl AsRef<str> for CategoryColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A category for grouping transactions (e.g., 'Food', 'Transport').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category, never reused after the category is deleted.
    pub id: CategoryId,
    /// The display name.
    pub name: CategoryName,
    /// The display colour.
    pub color: CategoryColor,
}

/// The validated fields for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// The display name.
    pub name: CategoryName,
    /// The display colour.
    pub color: CategoryColor,
}

/// The validated fields for a partial category update.
///
/// Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    /// The new name, if any.
    pub name: Option<CategoryName>,
    /// The new colour, if any.
    pub color: Option<CategoryColor>,
}

/// The outcome of deleting several categories at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeletion {
    /// The categories that were deleted along with their transactions.
    pub deleted: Vec<CategoryId>,
    /// The requested IDs that did not refer to a category.
    pub missing: Vec<CategoryId>,
}
