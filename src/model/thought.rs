use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DocumentId;

/// A thought document. Ownership is the denormalized `username`, not an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub thought_text: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Thought {
    pub fn new(thought_text: String, username: String) -> Self {
        Self {
            id: DocumentId::new(),
            thought_text,
            username,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, patch: ThoughtPatch) {
        if let Some(text) = patch.thought_text {
            self.thought_text = text;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
    }
}

/// Body of `POST /thoughts`. `user_id` names the user whose `thoughts`
/// list receives the new id; the thought is posted under that user's name,
/// so `username` may be left out but must match when given.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThought {
    pub thought_text: String,
    #[serde(default)]
    pub username: Option<String>,
    pub user_id: DocumentId,
}

/// Body of `PUT /thoughts/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtPatch {
    pub thought_text: Option<String>,
    pub username: Option<String>,
}
