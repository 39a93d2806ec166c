//! The API endpoint URIs.
//!
//! Endpoints that take a parameter, e.g., '/categories/{category_id}', are
//! axum path templates.

/// The health check banner.
pub const ROOT: &str = "/";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/categories";
/// The route to delete several categories at once.
pub const CATEGORY_BATCH: &str = "/categories/batch";
/// The route to update or delete a single category.
pub const CATEGORY: &str = "/categories/{category_id}";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with the next right brace,
/// e.g. '{category_id}' in '/categories/{category_id}'. Only the first
/// parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
