use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use super::response::{json_response, message_response};
use crate::store::StoreError;

pub const USER_NOT_FOUND: &str = "No user found with this id!";
pub const FRIEND_NOT_FOUND: &str = "No user or friend found with the provided id!";
pub const THOUGHT_NOT_FOUND: &str = "No thought found with this id!";

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures a handler can end with
#[derive(Debug, Error)]
pub enum ApiError {
    /// A referenced document is absent
    #[error("{0}")]
    NotFound(&'static str),

    /// The request body is not JSON at all
    #[error("malformed JSON body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error, logging store failures
    pub fn into_response(self, method: &str, path: &str) -> Response<Full<Bytes>> {
        let status = self.status();
        match self {
            Self::NotFound(message) => message_response(status, message),
            Self::BadRequest(detail) => {
                log::debug!("{method} {path}: rejected body: {detail}");
                message_response(status, &format!("malformed JSON body: {detail}"))
            }
            Self::Store(err) => {
                log::error!("{method} {path} failed: {err}");
                json_response(
                    status,
                    &serde_json::json!({ "name": err.name(), "message": err.to_string() }),
                )
            }
        }
    }
}
