//! REST API module
//!
//! Turns a request into a response: transport checks first (preflight,
//! health probes, body limits), then endpoint dispatch to the user, friend
//! and thought handlers. Handlers only see the store through `AppState`.

mod error;
mod friends;
mod response;
mod thoughts;
mod users;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

pub use error::{ApiError, ApiResult, FRIEND_NOT_FOUND, THOUGHT_NOT_FOUND, USER_NOT_FOUND};

use crate::config::AppState;
use crate::http;
use crate::routing::{match_endpoint, Endpoint};
use response::{message_response, route_not_found};

/// Request entry point used by the connection layer
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if let Some(response) = handle_health(&state, &method, &path).await {
        return Ok(response);
    }

    if method == Method::OPTIONS {
        return Ok(match match_endpoint(&path) {
            Some(endpoint) => {
                http::build_options_response(state.config.http.enable_cors, &endpoint.allow_header())
            }
            None => route_not_found(),
        });
    }

    let limit = state.config.http.max_body_size;
    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if let Some(len) = declared.filter(|len| *len > limit) {
        log::warn!("{method} {path}: declared body of {len} bytes exceeds {limit}");
        return Ok(http::build_413_response(limit));
    }

    let body = Limited::new(req.into_body(), usize::try_from(limit).unwrap_or(usize::MAX));
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            log::warn!("{method} {path}: body exceeds {limit} bytes");
            return Ok(http::build_413_response(limit));
        }
        Err(e) => {
            log::warn!("{method} {path}: failed to read request body: {e}");
            return Ok(message_response(
                StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ));
        }
    };

    Ok(dispatch(&state, &method, &path, &body).await)
}

/// Route a fully read request to its handler
pub async fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    body: &[u8],
) -> Response<Full<Bytes>> {
    let Some(endpoint) = match_endpoint(path) else {
        return route_not_found();
    };
    if !endpoint.allows(method.as_str()) {
        return http::build_405_response(&endpoint.allow_header());
    }

    let store = state.store.as_ref();
    let result = match (&endpoint, method.as_str()) {
        (Endpoint::Users, "GET") => users::list(store).await,
        (Endpoint::Users, "POST") => users::create(store, body).await,
        (Endpoint::User { id }, "GET") => users::get(store, id).await,
        (Endpoint::User { id }, "PUT") => users::update(store, id, body).await,
        (Endpoint::User { id }, "DELETE") => users::delete(store, id).await,
        (Endpoint::Friend { user_id, friend_id }, "POST") => {
            friends::add(store, user_id, friend_id).await
        }
        (Endpoint::Friend { user_id, friend_id }, "DELETE") => {
            friends::remove(store, user_id, friend_id).await
        }
        (Endpoint::Thoughts, "GET") => thoughts::list(store).await,
        (Endpoint::Thoughts, "POST") => thoughts::create(store, body).await,
        (Endpoint::Thought { id }, "GET") => thoughts::get(store, id).await,
        (Endpoint::Thought { id }, "PUT") => thoughts::update(store, id, body).await,
        (Endpoint::Thought { id }, "DELETE") => thoughts::delete(store, id).await,
        _ => return http::build_405_response(&endpoint.allow_header()),
    };

    result.unwrap_or_else(|err| err.into_response(method.as_str(), path))
}

/// Answer liveness and readiness probes, if enabled and addressed
async fn handle_health(
    state: &AppState,
    method: &Method,
    path: &str,
) -> Option<Response<Full<Bytes>>> {
    let health = &state.config.health;
    if !health.enabled || (path != health.liveness_path && path != health.readiness_path) {
        return None;
    }
    if method != Method::GET && method != Method::HEAD {
        return Some(http::build_405_response("GET, HEAD"));
    }

    if path == health.liveness_path {
        return Some(http::build_health_response(StatusCode::OK, "ok"));
    }
    Some(match state.store.ping().await {
        Ok(()) => http::build_health_response(StatusCode::OK, "ready"),
        Err(e) => {
            log::warn!("readiness check failed: {e}");
            http::build_health_response(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    })
}
