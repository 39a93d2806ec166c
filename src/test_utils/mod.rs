#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod server;
pub(crate) mod store;

pub(crate) use http::{assert_content_type, read_error_body};
pub(crate) use server::{get_failing_test_server, get_sql_test_server};
pub(crate) use store::{
    FailingStore, create_test_category, create_test_transaction, get_test_stores,
};
