//! Pocketbook is a small personal finance tracker.
//!
//! This library provides a JSON REST API for categories and the transactions
//! filed under them, backed by SQLite, plus a reconciliation layer that keeps
//! a client's cached lists in step with the store.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::Response;
use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod category;
mod database_id;
mod db;
mod endpoints;
pub mod filter;
mod logging;
pub mod reconcile;
mod response;
mod routing;
mod timestamp;
pub mod transaction;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, SQLAppState, create_app_state};
pub use database_id::{CategoryId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    response::{internal_server_error, json_error},
    validation::ValidationError,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client supplied input that failed validation.
    ///
    /// Validation always happens before the store is touched, so this error
    /// implies that nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// An unhandled/unexpected SQL error.
    ///
    /// The error string should only be logged for debugging on the server.
    /// Clients only ever see a generic message.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// Convert the error into a JSON `{"error": ...}` response.
    ///
    /// `failure_message` is shown to the client in place of the error text
    /// for errors that are not the client's fault, e.g. "Failed to create
    /// category". The underlying error is logged instead.
    pub fn into_json_response(self, failure_message: &str) -> Response {
        use axum::http::StatusCode;

        match self {
            Error::Validation(error) => json_error(StatusCode::BAD_REQUEST, &error.to_string()),
            Error::NotFound => json_error(StatusCode::NOT_FOUND, "Not found"),
            Error::UpdateMissingCategory | Error::DeleteMissingCategory => {
                json_error(StatusCode::NOT_FOUND, "Category not found")
            }
            Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                json_error(StatusCode::NOT_FOUND, "Transaction not found")
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("{failure_message}: {error}");
                internal_server_error(failure_message)
            }
        }
    }
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_json_response("Something went wrong")
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, validation::ValidationError};

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_error_is_bad_request() {
        let response = Error::Validation(ValidationError::NonPositiveAmount).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_records_are_not_found() {
        for error in [
            Error::NotFound,
            Error::UpdateMissingCategory,
            Error::DeleteMissingCategory,
            Error::UpdateMissingTransaction,
            Error::DeleteMissingTransaction,
        ] {
            let response = error.into_json_response("Failed");

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn lock_error_is_internal_server_error() {
        let response = Error::DatabaseLockError.into_json_response("Failed to fetch categories");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
