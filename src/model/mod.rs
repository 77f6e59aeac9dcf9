//! Document model
//!
//! Shapes of the two collections exposed by the API plus the request bodies
//! that create or patch them.

mod id;
mod thought;
mod user;

pub use id::DocumentId;
pub use thought::{NewThought, Thought, ThoughtPatch};
pub use user::{NewUser, PopulatedUser, User, UserPatch};
