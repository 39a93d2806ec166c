use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState, SQLAppState, build_router, category::CategoryStore, create_app_state,
    test_utils::FailingStore, transaction::TransactionStore,
};

#[track_caller]
pub(crate) fn get_test_server<C, T>(state: AppState<C, T>) -> TestServer
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
{
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// A server backed by a fresh in-memory database, and the state it shares.
#[track_caller]
pub(crate) fn get_sql_test_server() -> (SQLAppState, TestServer) {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    let state = create_app_state(connection).expect("Could not initialize database.");

    (state.clone(), get_test_server(state))
}

/// A server where every store operation fails.
#[track_caller]
pub(crate) fn get_failing_test_server() -> TestServer {
    get_test_server(AppState::new(FailingStore, FailingStore))
}
