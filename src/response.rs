//! JSON response bodies shared by the route handlers.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{Error, validation::ValidationError};

/// The body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// The body of responses that only confirm that something happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for MessageBody {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_owned(),
        }),
    )
        .into_response()
}

/// A 500 response with a generic `message`.
///
/// Never pass internal error text here, it goes straight to the client.
pub fn internal_server_error(message: &str) -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// The fallback for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

/// Unwrap a JSON body, turning axum's rejection into a validation error so
/// that malformed bodies get the same `{"error": ...}` shape as everything else.
pub fn read_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()).into())
}
