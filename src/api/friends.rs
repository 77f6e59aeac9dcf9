// Friend list handlers
//
// Only the addressed user's list changes; the friend document is a
// presence check and is never written.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::error::{ApiError, ApiResult, FRIEND_NOT_FOUND};
use super::response::ok;
use crate::model::DocumentId;
use crate::store::DocumentStore;

/// `POST /users/:userId/friends/:friendId`
pub async fn add(
    store: &dyn DocumentStore,
    user_id: &str,
    friend_id: &str,
) -> ApiResult<Response<Full<Bytes>>> {
    let (user_id, friend_id) = check_pair(store, user_id, friend_id).await?;
    let user = store
        .push_friend(user_id, friend_id)
        .await?
        .ok_or(ApiError::NotFound(FRIEND_NOT_FOUND))?;
    ok(&user)
}

/// `DELETE /users/:userId/friends/:friendId`
pub async fn remove(
    store: &dyn DocumentStore,
    user_id: &str,
    friend_id: &str,
) -> ApiResult<Response<Full<Bytes>>> {
    let (user_id, friend_id) = check_pair(store, user_id, friend_id).await?;
    let user = store
        .pull_friend(user_id, friend_id)
        .await?
        .ok_or(ApiError::NotFound(FRIEND_NOT_FOUND))?;
    ok(&user)
}

/// Look up both documents at once; both must exist.
///
/// Only ids come back: the list change is a single store call of its own.
async fn check_pair(
    store: &dyn DocumentStore,
    user_id: &str,
    friend_id: &str,
) -> ApiResult<(DocumentId, DocumentId)> {
    let user_id = DocumentId::parse(user_id)?;
    let friend_id = DocumentId::parse(friend_id)?;

    let (user, friend) = tokio::try_join!(store.find_user(user_id), store.find_user(friend_id))?;
    match (user, friend) {
        (Some(_), Some(_)) => Ok((user_id, friend_id)),
        _ => Err(ApiError::NotFound(FRIEND_NOT_FOUND)),
    }
}
