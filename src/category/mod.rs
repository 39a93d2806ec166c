//! Categories that transactions are filed under.
//!
//! Deleting a category also deletes every transaction in it, see
//! [CategoryStore::delete].

mod domain;
mod handlers;
mod sqlite;
mod store;

pub use domain::{BatchDeletion, Category, CategoryColor, CategoryName, CategoryUpdate, NewCategory};
pub use handlers::{
    create_category_endpoint, delete_categories_endpoint, delete_category_endpoint,
    list_categories_endpoint, update_category_endpoint,
};
pub use sqlite::SQLiteCategoryStore;
pub use store::CategoryStore;

pub(crate) use sqlite::category_exists;
