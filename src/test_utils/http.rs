use axum::{
    body::{Body, to_bytes},
    response::Response,
};

use crate::response::ErrorBody;

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

/// Read the message out of a `{"error": ...}` response body.
pub(crate) async fn read_error_body(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice::<ErrorBody>(&bytes)
        .expect("Response body is not an error body")
        .error
}
