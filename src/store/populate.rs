use crate::model::{PopulatedUser, User};

use super::{DocumentStore, StoreResult};

/// Expand a user's thought and friend references into full documents.
///
/// References whose target no longer exists are dropped, which is how a
/// friend id left behind by a deleted user disappears from responses.
pub async fn populate_user(store: &dyn DocumentStore, user: User) -> StoreResult<PopulatedUser> {
    let (thoughts, friends) = tokio::try_join!(
        store.find_thoughts_by_ids(&user.thoughts),
        store.find_users_by_ids(&user.friends),
    )?;
    Ok(PopulatedUser::new(user, thoughts, friends))
}
