//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::{
    AppState,
    category::{
        CategoryStore, create_category_endpoint, delete_categories_endpoint,
        delete_category_endpoint, list_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    response::{MessageBody, get_404_not_found},
    transaction::{
        TransactionStore, create_transaction_endpoint, delete_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router<C, T>(state: AppState<C, T>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint::<C, T>).post(create_category_endpoint::<C, T>),
        )
        .route(
            endpoints::CATEGORY_BATCH,
            delete(delete_categories_endpoint::<C, T>),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint::<C, T>).delete(delete_category_endpoint::<C, T>),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint::<C, T>).post(create_transaction_endpoint::<C, T>),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint::<C, T>).delete(delete_transaction_endpoint::<C, T>),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' reports that the server is up.
async fn get_index() -> MessageBody {
    MessageBody::new("Pocketbook API Server is running")
}
