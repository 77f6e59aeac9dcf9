//! Document store
//!
//! The API talks to storage only through [`DocumentStore`], which is handed
//! to the router inside `AppState`. [`MemoryStore`] is the bundled
//! implementation; it can mirror itself to a JSON snapshot file.

mod error;
mod memory;
mod populate;
mod snapshot;

use async_trait::async_trait;

use crate::model::{DocumentId, NewUser, Thought, ThoughtPatch, User, UserPatch};

pub use error::{StoreError, StoreResult};
pub use memory::{Collections, MemoryStore};
pub use populate::populate_user;
pub use snapshot::SnapshotFile;

/// Storage operations needed by the HTTP handlers.
///
/// Lookups by id return `Ok(None)` for a missing document; only genuine
/// storage failures are errors.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user(&self, id: DocumentId) -> StoreResult<Option<User>>;

    /// Resolve `ids` in order. Missing documents are skipped and repeated
    /// ids yield repeated documents.
    async fn find_users_by_ids(&self, ids: &[DocumentId]) -> StoreResult<Vec<User>>;

    async fn insert_user(&self, new_user: NewUser) -> StoreResult<User>;

    /// Apply `patch` and return the post-update document.
    async fn update_user(&self, id: DocumentId, patch: UserPatch) -> StoreResult<Option<User>>;

    /// Append `friend_id` to the user's friend list in one step and return
    /// the updated user. Duplicates are kept.
    async fn push_friend(
        &self,
        user_id: DocumentId,
        friend_id: DocumentId,
    ) -> StoreResult<Option<User>>;

    /// Remove every occurrence of `friend_id` from the user's friend list.
    async fn pull_friend(
        &self,
        user_id: DocumentId,
        friend_id: DocumentId,
    ) -> StoreResult<Option<User>>;

    /// Append `thought_id` to the user's thought list.
    async fn push_thought(
        &self,
        user_id: DocumentId,
        thought_id: DocumentId,
    ) -> StoreResult<Option<User>>;

    /// Remove `thought_id` from every user that references it, returning how
    /// many references went.
    async fn pull_thought(&self, thought_id: DocumentId) -> StoreResult<usize>;

    async fn delete_user(&self, id: DocumentId) -> StoreResult<Option<User>>;

    async fn find_thoughts(&self) -> StoreResult<Vec<Thought>>;

    async fn find_thought(&self, id: DocumentId) -> StoreResult<Option<Thought>>;

    /// Same ordering rules as [`DocumentStore::find_users_by_ids`].
    async fn find_thoughts_by_ids(&self, ids: &[DocumentId]) -> StoreResult<Vec<Thought>>;

    async fn insert_thought(&self, thought: Thought) -> StoreResult<Thought>;

    async fn update_thought(
        &self,
        id: DocumentId,
        patch: ThoughtPatch,
    ) -> StoreResult<Option<Thought>>;

    async fn delete_thought(&self, id: DocumentId) -> StoreResult<Option<Thought>>;

    /// Delete every thought owned by `username`, returning how many went.
    async fn delete_thoughts_by_username(&self, username: &str) -> StoreResult<usize>;

    /// Cheap liveness check used by the readiness probe.
    async fn ping(&self) -> StoreResult<()>;
}
