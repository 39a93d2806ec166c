//! Route handlers for listing, creating, updating and deleting transactions.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    filter::{TransactionFilter, TransactionQuery},
    response::{MessageBody, read_json},
    transaction::{TransactionStore, TransactionWithCategory},
    validation::{
        TransactionCandidate, ValidationError, parse_id, parse_new_transaction,
        parse_transaction_update,
    },
};

/// A route handler for listing transactions, newest first.
///
/// The optional query parameters `categoryId`, `startDate`, `endDate` and
/// `search` narrow down the list, see [TransactionFilter].
pub async fn list_transactions_endpoint<C, T>(
    State(state): State<AppState<C, T>>,
    query: Result<Query<TransactionQuery>, QueryRejection>,
) -> Response
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    match list_transactions(&state.transaction_store, query) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response("Failed to fetch transactions"),
    }
}

fn list_transactions(
    store: &impl TransactionStore,
    query: Result<Query<TransactionQuery>, QueryRejection>,
) -> Result<Vec<TransactionWithCategory>, Error> {
    let Query(query) =
        query.map_err(|rejection| ValidationError::MalformedQuery(rejection.body_text()))?;
    let filter = TransactionFilter::try_from(query)?;

    store.list(&filter)
}

/// A route handler for creating a new transaction.
///
/// The date defaults to the current time if the client does not send one.
/// Responds with 201 and the new transaction joined with its category.
pub async fn create_transaction_endpoint<C, T>(
    State(state): State<AppState<C, T>>,
    payload: Result<Json<TransactionCandidate>, JsonRejection>,
) -> Response
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    match create_transaction(&state.transaction_store, payload) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_json_response("Failed to create transaction"),
    }
}

fn create_transaction(
    store: &impl TransactionStore,
    payload: Result<Json<TransactionCandidate>, JsonRejection>,
) -> Result<TransactionWithCategory, Error> {
    let candidate = read_json(payload)?.with_default_date(OffsetDateTime::now_utc());
    let builder = parse_new_transaction(&candidate)?;

    store.create(builder)
}

/// A route handler for replacing the amount, category and description of a transaction.
pub async fn update_transaction_endpoint<C, T>(
    State(state): State<AppState<C, T>>,
    Path(transaction_id): Path<String>,
    payload: Result<Json<TransactionCandidate>, JsonRejection>,
) -> Response
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    match update_transaction(&state.transaction_store, &transaction_id, payload) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_json_response("Failed to update transaction"),
    }
}

fn update_transaction(
    store: &impl TransactionStore,
    transaction_id: &str,
    payload: Result<Json<TransactionCandidate>, JsonRejection>,
) -> Result<TransactionWithCategory, Error> {
    let transaction_id = parse_id(transaction_id)?;
    let candidate = read_json(payload)?;
    let update = parse_transaction_update(&candidate)?;

    store.update(transaction_id, update)
}

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint<C, T>(
    State(state): State<AppState<C, T>>,
    Path(transaction_id): Path<String>,
) -> Response
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
{
    let result = parse_id(&transaction_id)
        .map_err(Error::from)
        .and_then(|transaction_id| state.transaction_store.delete(transaction_id));

    match result {
        Ok(()) => MessageBody::new("Transaction deleted successfully").into_response(),
        Err(error) => error.into_json_response("Failed to delete transaction"),
    }
}
