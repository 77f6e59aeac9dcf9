// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{ApiError, ApiResult};
use crate::http;
use crate::store::StoreError;

/// Build JSON response
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    http::build_json_response(status, body)
}

/// 200 with a JSON document
#[allow(clippy::unnecessary_wraps)]
pub fn ok<T: Serialize + ?Sized>(body: &T) -> ApiResult<Response<Full<Bytes>>> {
    Ok(json_response(StatusCode::OK, body))
}

/// `{"message": ...}` response
pub fn message_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "message": message }))
}

/// 404 for paths no endpoint serves
pub fn route_not_found() -> Response<Full<Bytes>> {
    message_response(StatusCode::NOT_FOUND, "Route not found")
}

/// Decode a request body into `T`.
///
/// Bytes that are not JSON are a client error; JSON that does not fit the
/// document shape is a validation failure from the store's point of view.
/// An empty body reads as `{}`.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let value = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    serde_json::from_value(value).map_err(|e| StoreError::Validation(e.to_string()).into())
}
