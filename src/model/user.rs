use serde::{Deserialize, Serialize};

use super::{DocumentId, Thought};

/// A user document as stored: thoughts and friends are id references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub thoughts: Vec<DocumentId>,
    /// Directed and not deduplicated: the same id may appear more than once.
    #[serde(default)]
    pub friends: Vec<DocumentId>,
}

impl User {
    pub fn from_new(new_user: NewUser) -> Self {
        Self {
            id: DocumentId::new(),
            username: new_user.username,
            email: new_user.email,
            thoughts: Vec::new(),
            friends: Vec::new(),
        }
    }

    /// Apply the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(thoughts) = patch.thoughts {
            self.thoughts = thoughts;
        }
        if let Some(friends) = patch.friends {
            self.friends = friends;
        }
    }

    /// Drop every occurrence of `friend_id` from the friend list.
    pub fn remove_friend(&mut self, friend_id: DocumentId) {
        self.friends.retain(|id| *id != friend_id);
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `PUT /users/:id`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub thoughts: Option<Vec<DocumentId>>,
    pub friends: Option<Vec<DocumentId>>,
}

/// A user with its references expanded into full documents.
///
/// Friends are expanded one level only; their own `thoughts`/`friends`
/// remain id arrays.
#[derive(Debug, Clone, Serialize)]
pub struct PopulatedUser {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub thoughts: Vec<Thought>,
    pub friends: Vec<User>,
}

impl PopulatedUser {
    pub fn new(user: User, thoughts: Vec<Thought>, friends: Vec<User>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            thoughts,
            friends,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::from_new(NewUser {
            username: "alice".to_string(),
            email: None,
        })
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut user = alice();
        let friend = DocumentId::new();
        user.friends.push(friend);

        user.apply(UserPatch {
            email: Some("alice@example.com".to_string()),
            ..UserPatch::default()
        });

        assert_eq!(user.username, "alice");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
        assert_eq!(user.friends, vec![friend]);
    }

    #[test]
    fn test_remove_friend_drops_every_occurrence() {
        let mut user = alice();
        let bob = DocumentId::new();
        let carol = DocumentId::new();
        user.friends = vec![bob, carol, bob, bob];

        user.remove_friend(bob);
        assert_eq!(user.friends, vec![carol]);

        user.remove_friend(bob);
        assert_eq!(user.friends, vec![carol]);
    }

    #[test]
    fn test_serialized_shape() {
        let user = alice();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"], serde_json::json!(user.id.to_string()));
        assert_eq!(json["username"], "alice");
        assert_eq!(json["thoughts"], serde_json::json!([]));
        assert_eq!(json["friends"], serde_json::json!([]));
        assert!(json.get("email").is_none());
    }
}
