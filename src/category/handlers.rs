//! Route handlers for listing, creating, updating and deleting categories.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    category::{Category, CategoryStore},
    response::{MessageBody, read_json},
    validation::{
        BatchDeleteCandidate, CategoryCandidate, parse_batch_ids, parse_category_update, parse_id,
        parse_new_category,
    },
};

/// A route handler for listing every category, ordered by name.
pub async fn list_categories_endpoint<C, T>(State(state): State<AppState<C, T>>) -> Response
where
    C: CategoryStore + Clone + Send + Sync,
    T: Clone + Send + Sync,
{
    match state.category_store.list() {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => error.into_json_response("Failed to fetch categories"),
    }
}

/// A route handler for creating a new category.
///
/// Responds with 201 and the new category, or 400 if the name is invalid.
pub async fn create_category_endpoint<C, T>(
    State(state): State<AppState<C, T>>,
    payload: Result<Json<CategoryCandidate>, JsonRejection>,
) -> Response
where
    C: CategoryStore + Clone + Send + Sync,
    T: Clone + Send + Sync,
{
    match create_category(&state.category_store, payload) {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(error) => error.into_json_response("Failed to create category"),
    }
}

fn create_category(
    store: &impl CategoryStore,
    payload: Result<Json<CategoryCandidate>, JsonRejection>,
) -> Result<Category, Error> {
    let candidate = read_json(payload)?;
    let new_category = parse_new_category(&candidate)?;

    store.create(new_category)
}

/// A route handler for changing the name and/or colour of a category.
pub async fn update_category_endpoint<C, T>(
    State(state): State<AppState<C, T>>,
    Path(category_id): Path<String>,
    payload: Result<Json<CategoryCandidate>, JsonRejection>,
) -> Response
where
    C: CategoryStore + Clone + Send + Sync,
    T: Clone + Send + Sync,
{
    match update_category(&state.category_store, &category_id, payload) {
        Ok(category) => Json(category).into_response(),
        Err(error) => error.into_json_response("Failed to update category"),
    }
}

fn update_category(
    store: &impl CategoryStore,
    category_id: &str,
    payload: Result<Json<CategoryCandidate>, JsonRejection>,
) -> Result<Category, Error> {
    let category_id = parse_id(category_id)?;
    let candidate = read_json(payload)?;
    let update = parse_category_update(&candidate)?;

    store.update(category_id, update)
}

/// A route handler for deleting a category along with all of its transactions.
pub async fn delete_category_endpoint<C, T>(
    State(state): State<AppState<C, T>>,
    Path(category_id): Path<String>,
) -> Response
where
    C: CategoryStore + Clone + Send + Sync,
    T: Clone + Send + Sync,
{
    let result = parse_id(&category_id)
        .map_err(Error::from)
        .and_then(|category_id| state.category_store.delete(category_id));

    match result {
        Ok(()) => MessageBody::new("Category deleted successfully").into_response(),
        Err(error) => error.into_json_response("Failed to delete category"),
    }
}

/// A route handler for deleting several categories, and their transactions, at once.
///
/// IDs that do not refer to a category are skipped. The response message
/// counts the categories that were actually deleted.
pub async fn delete_categories_endpoint<C, T>(
    State(state): State<AppState<C, T>>,
    payload: Result<Json<BatchDeleteCandidate>, JsonRejection>,
) -> Response
where
    C: CategoryStore + Clone + Send + Sync,
    T: Clone + Send + Sync,
{
    let result = read_json(payload)
        .and_then(|candidate| parse_batch_ids(&candidate).map_err(Error::from))
        .and_then(|ids| state.category_store.delete_batch(&ids));

    match result {
        Ok(deletion) => {
            if !deletion.missing.is_empty() {
                tracing::debug!(
                    "skipped deleting missing categories {:?}",
                    deletion.missing
                );
            }

            MessageBody::new(format!(
                "{} categories deleted successfully",
                deletion.deleted.len()
            ))
            .into_response()
        }
        Err(error) => error.into_json_response("Failed to delete categories"),
    }
}
