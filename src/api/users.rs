// User endpoint handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::error::{ApiError, ApiResult, USER_NOT_FOUND};
use super::response::{ok, parse_body};
use crate::model::{DocumentId, NewUser, UserPatch};
use crate::store::{populate_user, DocumentStore};

/// `GET /users`
pub async fn list(store: &dyn DocumentStore) -> ApiResult<Response<Full<Bytes>>> {
    let users = store.find_users().await?;
    let mut populated = Vec::with_capacity(users.len());
    for user in users {
        populated.push(populate_user(store, user).await?);
    }
    ok(&populated)
}

/// `GET /users/:id`
pub async fn get(store: &dyn DocumentStore, id: &str) -> ApiResult<Response<Full<Bytes>>> {
    let id = DocumentId::parse(id)?;
    let user = store
        .find_user(id)
        .await?
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;
    ok(&populate_user(store, user).await?)
}

/// `POST /users`
pub async fn create(store: &dyn DocumentStore, body: &[u8]) -> ApiResult<Response<Full<Bytes>>> {
    let new_user: NewUser = parse_body(body)?;
    let user = store.insert_user(new_user).await?;
    log::debug!("created user {} ({})", user.id, user.username);
    ok(&user)
}

/// `PUT /users/:id`
pub async fn update(
    store: &dyn DocumentStore,
    id: &str,
    body: &[u8],
) -> ApiResult<Response<Full<Bytes>>> {
    let id = DocumentId::parse(id)?;
    let patch: UserPatch = parse_body(body)?;
    let user = store
        .update_user(id, patch)
        .await?
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;
    ok(&user)
}

/// `DELETE /users/:id`, cascading to every thought posted under the username
pub async fn delete(store: &dyn DocumentStore, id: &str) -> ApiResult<Response<Full<Bytes>>> {
    let id = DocumentId::parse(id)?;
    let user = store
        .delete_user(id)
        .await?
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;
    let removed = store.delete_thoughts_by_username(&user.username).await?;
    log::debug!("deleted user {} and {removed} thought(s)", user.id);
    ok(&user)
}
