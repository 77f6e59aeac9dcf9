//! In-memory document store
//!
//! Collections keep insertion order, so "find all" returns documents in the
//! order they were created.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{DocumentStore, SnapshotFile, StoreResult};
use crate::model::{DocumentId, NewUser, Thought, ThoughtPatch, User, UserPatch};

/// Everything the store holds; also the on-disk snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub thoughts: Vec<Thought>,
}

impl Collections {
    fn user_mut(&mut self, id: DocumentId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    fn thought_mut(&mut self, id: DocumentId) -> Option<&mut Thought> {
        self.thoughts.iter_mut().find(|t| t.id == id)
    }
}

pub struct MemoryStore {
    collections: RwLock<Collections>,
    snapshot: Option<SnapshotFile>,
}

impl MemoryStore {
    /// A volatile store that forgets everything on shutdown.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(Collections::default()),
            snapshot: None,
        }
    }

    /// A store backed by `snapshot`: loads it now and rewrites it after
    /// every mutation.
    pub fn open(snapshot: SnapshotFile) -> StoreResult<Self> {
        let collections = snapshot.load()?;
        Ok(Self {
            collections: RwLock::new(collections),
            snapshot: Some(snapshot),
        })
    }

    /// Run `f` under the write lock.
    ///
    /// With a snapshot, `f` works on a staged copy that replaces the live
    /// collections only once it has been written out, so a failed write
    /// leaves both memory and disk as they were. Calls that change nothing
    /// skip the write.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Collections) -> T) -> StoreResult<T> {
        let mut collections = self.collections.write().await;
        let Some(snapshot) = &self.snapshot else {
            return Ok(f(&mut *collections));
        };

        let mut staged = collections.clone();
        let result = f(&mut staged);
        if staged != *collections {
            snapshot.save(&staged)?;
            *collections = staged;
        }
        Ok(result)
    }

    /// Apply `f` to one user in a single locked step
    async fn modify_user(
        &self,
        id: DocumentId,
        f: impl FnOnce(&mut User) + Send,
    ) -> StoreResult<Option<User>> {
        self.mutate(|c| {
            c.user_mut(id).map(|user| {
                f(user);
                user.clone()
            })
        })
        .await
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_ordered<T: Clone>(
    docs: &[T],
    ids: &[DocumentId],
    id_of: impl Fn(&T) -> DocumentId,
) -> Vec<T> {
    ids.iter()
        .filter_map(|id| docs.iter().find(|doc| id_of(doc) == *id).cloned())
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.collections.read().await.users.clone())
    }

    async fn find_user(&self, id: DocumentId) -> StoreResult<Option<User>> {
        let collections = self.collections.read().await;
        Ok(collections.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_users_by_ids(&self, ids: &[DocumentId]) -> StoreResult<Vec<User>> {
        let collections = self.collections.read().await;
        Ok(resolve_ordered(&collections.users, ids, |u| u.id))
    }

    async fn insert_user(&self, new_user: NewUser) -> StoreResult<User> {
        let user = User::from_new(new_user);
        let stored = user.clone();
        self.mutate(|c| c.users.push(stored)).await?;
        Ok(user)
    }

    async fn update_user(&self, id: DocumentId, patch: UserPatch) -> StoreResult<Option<User>> {
        self.modify_user(id, |user| user.apply(patch)).await
    }

    async fn push_friend(
        &self,
        user_id: DocumentId,
        friend_id: DocumentId,
    ) -> StoreResult<Option<User>> {
        self.modify_user(user_id, |user| user.friends.push(friend_id))
            .await
    }

    async fn pull_friend(
        &self,
        user_id: DocumentId,
        friend_id: DocumentId,
    ) -> StoreResult<Option<User>> {
        self.modify_user(user_id, |user| user.remove_friend(friend_id))
            .await
    }

    async fn push_thought(
        &self,
        user_id: DocumentId,
        thought_id: DocumentId,
    ) -> StoreResult<Option<User>> {
        self.modify_user(user_id, |user| user.thoughts.push(thought_id))
            .await
    }

    async fn pull_thought(&self, thought_id: DocumentId) -> StoreResult<usize> {
        self.mutate(|c| {
            c.users
                .iter_mut()
                .map(|user| {
                    let before = user.thoughts.len();
                    user.thoughts.retain(|id| *id != thought_id);
                    before - user.thoughts.len()
                })
                .sum::<usize>()
        })
        .await
    }

    async fn delete_user(&self, id: DocumentId) -> StoreResult<Option<User>> {
        self.mutate(|c| {
            let idx = c.users.iter().position(|u| u.id == id)?;
            Some(c.users.remove(idx))
        })
        .await
    }

    async fn find_thoughts(&self) -> StoreResult<Vec<Thought>> {
        Ok(self.collections.read().await.thoughts.clone())
    }

    async fn find_thought(&self, id: DocumentId) -> StoreResult<Option<Thought>> {
        let collections = self.collections.read().await;
        Ok(collections.thoughts.iter().find(|t| t.id == id).cloned())
    }

    async fn find_thoughts_by_ids(&self, ids: &[DocumentId]) -> StoreResult<Vec<Thought>> {
        let collections = self.collections.read().await;
        Ok(resolve_ordered(&collections.thoughts, ids, |t| t.id))
    }

    async fn insert_thought(&self, thought: Thought) -> StoreResult<Thought> {
        let stored = thought.clone();
        self.mutate(|c| c.thoughts.push(stored)).await?;
        Ok(thought)
    }

    async fn update_thought(
        &self,
        id: DocumentId,
        patch: ThoughtPatch,
    ) -> StoreResult<Option<Thought>> {
        self.mutate(|c| {
            c.thought_mut(id).map(|thought| {
                thought.apply(patch);
                thought.clone()
            })
        })
        .await
    }

    async fn delete_thought(&self, id: DocumentId) -> StoreResult<Option<Thought>> {
        self.mutate(|c| {
            let idx = c.thoughts.iter().position(|t| t.id == id)?;
            Some(c.thoughts.remove(idx))
        })
        .await
    }

    async fn delete_thoughts_by_username(&self, username: &str) -> StoreResult<usize> {
        self.mutate(|c| {
            let before = c.thoughts.len();
            c.thoughts.retain(|t| t.username != username);
            before - c.thoughts.len()
        })
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        let _guard = self.collections.read().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: None,
        }
    }

    fn thought_by(user: &User, text: &str) -> Thought {
        Thought::new(text.to_string(), user.username.clone())
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice")).await.unwrap();

        let found = store.find_user(alice.id).await.unwrap();
        assert_eq!(found, Some(alice));
        assert!(store.find_user(DocumentId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_users_keeps_insertion_order() {
        let store = MemoryStore::new();
        for name in ["carol", "alice", "bob"] {
            store.insert_user(new_user(name)).await.unwrap();
        }
        let names: Vec<String> = store
            .find_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["carol", "alice", "bob"]);
    }

    #[tokio::test]
    async fn test_update_user_returns_new_value() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice")).await.unwrap();

        let patch = UserPatch {
            username: Some("alicia".to_string()),
            ..UserPatch::default()
        };
        let updated = store.update_user(alice.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.username, "alicia");
        assert_eq!(
            store.find_user(alice.id).await.unwrap().unwrap().username,
            "alicia"
        );

        let missing = store
            .update_user(DocumentId::new(), UserPatch::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_push_and_pull_friend() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice")).await.unwrap();
        let bob = store.insert_user(new_user("bob")).await.unwrap();

        store.push_friend(alice.id, bob.id).await.unwrap();
        let updated = store.push_friend(alice.id, bob.id).await.unwrap().unwrap();
        assert_eq!(updated.friends, vec![bob.id, bob.id]);

        let updated = store.pull_friend(alice.id, bob.id).await.unwrap().unwrap();
        assert!(updated.friends.is_empty());

        let missing = store.push_friend(DocumentId::new(), bob.id).await.unwrap();
        assert!(missing.is_none());
        assert!(store.find_user(bob.id).await.unwrap().unwrap().friends.is_empty());
    }

    #[tokio::test]
    async fn test_pull_thought_from_every_referencing_user() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice")).await.unwrap();
        let bob = store.insert_user(new_user("bob")).await.unwrap();
        let thought = store.insert_thought(thought_by(&alice, "shared")).await.unwrap();
        let other = store.insert_thought(thought_by(&alice, "other")).await.unwrap();

        store.push_thought(alice.id, thought.id).await.unwrap();
        store.push_thought(alice.id, other.id).await.unwrap();
        store.push_thought(bob.id, thought.id).await.unwrap();

        assert_eq!(store.pull_thought(thought.id).await.unwrap(), 2);
        assert_eq!(
            store.find_user(alice.id).await.unwrap().unwrap().thoughts,
            vec![other.id]
        );
        assert!(store.find_user(bob.id).await.unwrap().unwrap().thoughts.is_empty());
        assert_eq!(store.pull_thought(thought.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_user_is_not_repeatable() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice")).await.unwrap();

        assert_eq!(store.delete_user(alice.id).await.unwrap(), Some(alice.clone()));
        assert!(store.delete_user(alice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_thoughts_by_username() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice")).await.unwrap();
        let bob = store.insert_user(new_user("bob")).await.unwrap();
        for text in ["one", "two", "three"] {
            store.insert_thought(thought_by(&alice, text)).await.unwrap();
        }
        let kept = store.insert_thought(thought_by(&bob, "mine")).await.unwrap();

        assert_eq!(store.delete_thoughts_by_username("alice").await.unwrap(), 3);
        assert_eq!(store.find_thoughts().await.unwrap(), vec![kept]);
        assert_eq!(store.delete_thoughts_by_username("alice").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_by_ids_order_duplicates_and_missing() {
        let store = MemoryStore::new();
        let a = store.insert_user(new_user("a")).await.unwrap();
        let b = store.insert_user(new_user("b")).await.unwrap();

        let ids = [b.id, DocumentId::new(), a.id, b.id];
        let names: Vec<String> = store
            .find_users_by_ids(&ids)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["b", "a", "b"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_thought() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice")).await.unwrap();
        let thought = store.insert_thought(thought_by(&alice, "draft")).await.unwrap();

        let patch = ThoughtPatch {
            thought_text: Some("final".to_string()),
            username: None,
        };
        let updated = store.update_thought(thought.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.thought_text, "final");
        assert_eq!(updated.created_at, thought.created_at);

        assert!(store.delete_thought(thought.id).await.unwrap().is_some());
        assert!(store.find_thought(thought.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("store.json");

        let alice = {
            let store = MemoryStore::open(SnapshotFile::new(&path)).unwrap();
            let alice = store.insert_user(new_user("alice")).await.unwrap();
            store.insert_thought(thought_by(&alice, "persisted")).await.unwrap();
            alice
        };
        assert!(path.exists());

        let reopened = MemoryStore::open(SnapshotFile::new(&path)).unwrap();
        assert_eq!(reopened.find_user(alice.id).await.unwrap(), Some(alice));
        assert_eq!(reopened.find_thoughts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = MemoryStore::open(SnapshotFile::new(&path));
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_failed_snapshot_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = MemoryStore::open(SnapshotFile::new(&path)).unwrap();
        let alice = store.insert_user(new_user("alice")).await.unwrap();
        store.insert_thought(thought_by(&alice, "kept")).await.unwrap();

        // A directory in place of the snapshot makes every write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = store.delete_user(alice.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.find_user(alice.id).await.unwrap(), Some(alice.clone()));

        assert!(store.delete_thoughts_by_username("alice").await.is_err());
        assert_eq!(store.find_thoughts().await.unwrap().len(), 1);

        // Nothing to change, so nothing to write
        assert!(store.delete_user(DocumentId::new()).await.unwrap().is_none());
        assert_eq!(store.delete_thoughts_by_username("nobody").await.unwrap(), 0);
    }
}
