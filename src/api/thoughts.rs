// Thought endpoint handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::error::{ApiError, ApiResult, THOUGHT_NOT_FOUND, USER_NOT_FOUND};
use super::response::{ok, parse_body};
use crate::model::{DocumentId, NewThought, Thought, ThoughtPatch};
use crate::store::{DocumentStore, StoreError};

/// `GET /thoughts`
pub async fn list(store: &dyn DocumentStore) -> ApiResult<Response<Full<Bytes>>> {
    ok(&store.find_thoughts().await?)
}

/// `GET /thoughts/:id`
pub async fn get(store: &dyn DocumentStore, id: &str) -> ApiResult<Response<Full<Bytes>>> {
    let id = DocumentId::parse(id)?;
    let thought = store
        .find_thought(id)
        .await?
        .ok_or(ApiError::NotFound(THOUGHT_NOT_FOUND))?;
    ok(&thought)
}

/// `POST /thoughts`: store the thought under the posting user's name and
/// link it from that user
pub async fn create(store: &dyn DocumentStore, body: &[u8]) -> ApiResult<Response<Full<Bytes>>> {
    let new_thought: NewThought = parse_body(body)?;
    let user = store
        .find_user(new_thought.user_id)
        .await?
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;

    if let Some(claimed) = &new_thought.username {
        if *claimed != user.username {
            return Err(StoreError::Validation(format!(
                "username \"{claimed}\" does not belong to user {}",
                user.id
            ))
            .into());
        }
    }

    let thought = store
        .insert_thought(Thought::new(new_thought.thought_text, user.username))
        .await?;
    if store.push_thought(user.id, thought.id).await?.is_none() {
        // The user was deleted between the lookup and the link
        store.delete_thought(thought.id).await?;
        return Err(ApiError::NotFound(USER_NOT_FOUND));
    }
    ok(&thought)
}

/// `PUT /thoughts/:id`
pub async fn update(
    store: &dyn DocumentStore,
    id: &str,
    body: &[u8],
) -> ApiResult<Response<Full<Bytes>>> {
    let id = DocumentId::parse(id)?;
    let patch: ThoughtPatch = parse_body(body)?;
    let thought = store
        .update_thought(id, patch)
        .await?
        .ok_or(ApiError::NotFound(THOUGHT_NOT_FOUND))?;
    ok(&thought)
}

/// `DELETE /thoughts/:id`
pub async fn delete(store: &dyn DocumentStore, id: &str) -> ApiResult<Response<Full<Bytes>>> {
    let id = DocumentId::parse(id)?;
    let thought = store
        .delete_thought(id)
        .await?
        .ok_or(ApiError::NotFound(THOUGHT_NOT_FOUND))?;

    store.pull_thought(thought.id).await?;
    ok(&thought)
}
