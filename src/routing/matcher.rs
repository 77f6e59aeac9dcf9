//! Route matching module
//!
//! Paths are matched segment by segment. Empty segments are ignored, so a
//! trailing slash or a doubled slash resolves to the same endpoint.

/// A matched endpoint with its raw path parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `/users`
    Users,
    /// `/users/:id`
    User { id: &'a str },
    /// `/users/:userId/friends/:friendId`
    Friend { user_id: &'a str, friend_id: &'a str },
    /// `/thoughts`
    Thoughts,
    /// `/thoughts/:id`
    Thought { id: &'a str },
}

impl Endpoint<'_> {
    /// Methods served on this endpoint, in `Allow` header order
    pub const fn allowed_methods(&self) -> &'static [&'static str] {
        match self {
            Self::Users | Self::Thoughts => &["GET", "POST"],
            Self::User { .. } | Self::Thought { .. } => &["GET", "PUT", "DELETE"],
            Self::Friend { .. } => &["POST", "DELETE"],
        }
    }

    pub fn allows(&self, method: &str) -> bool {
        self.allowed_methods().contains(&method)
    }

    /// Value for an `Allow` header
    pub fn allow_header(&self) -> String {
        let mut methods = self.allowed_methods().to_vec();
        methods.push("OPTIONS");
        methods.join(", ")
    }
}

/// Find the endpoint addressed by `path`, ignoring the method
pub fn match_endpoint(path: &str) -> Option<Endpoint<'_>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments[..] {
        ["users"] => Some(Endpoint::Users),
        ["users", id] => Some(Endpoint::User { id }),
        ["users", user_id, "friends", friend_id] => Some(Endpoint::Friend { user_id, friend_id }),
        ["thoughts"] => Some(Endpoint::Thoughts),
        ["thoughts", id] => Some(Endpoint::Thought { id }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_collections() {
        assert_eq!(match_endpoint("/users"), Some(Endpoint::Users));
        assert_eq!(match_endpoint("/thoughts"), Some(Endpoint::Thoughts));
    }

    #[test]
    fn test_match_documents() {
        assert_eq!(match_endpoint("/users/abc"), Some(Endpoint::User { id: "abc" }));
        assert_eq!(
            match_endpoint("/thoughts/t1"),
            Some(Endpoint::Thought { id: "t1" })
        );
    }

    #[test]
    fn test_match_friend() {
        assert_eq!(
            match_endpoint("/users/a/friends/b"),
            Some(Endpoint::Friend {
                user_id: "a",
                friend_id: "b"
            })
        );
    }

    #[test]
    fn test_trailing_slash_ignored() {
        assert_eq!(match_endpoint("/users/"), Some(Endpoint::Users));
        assert_eq!(match_endpoint("/users/abc/"), Some(Endpoint::User { id: "abc" }));
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(match_endpoint("/"), None);
        assert_eq!(match_endpoint("/users/a/friends"), None);
        assert_eq!(match_endpoint("/users/a/enemies/b"), None);
        assert_eq!(match_endpoint("/api/users"), None);
    }

    #[test]
    fn test_allow_header() {
        assert_eq!(Endpoint::Users.allow_header(), "GET, POST, OPTIONS");
        let friend = Endpoint::Friend {
            user_id: "a",
            friend_id: "b",
        };
        assert_eq!(friend.allow_header(), "POST, DELETE, OPTIONS");
        assert!(!friend.allows("GET"));
        assert!(friend.allows("DELETE"));
    }
}
