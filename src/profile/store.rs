use super::{ladder_default_rating, Role, RoleProfile};
use crate::error::Result;
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Repository boundary for role profiles. Concrete persistence is an
/// external collaborator; this trait is the narrow interface
/// the matchmaking engine and lobby coordinator depend on.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Raw stored profiles for a user, without materializing defaults.
    async fn stored_profiles(&self, user_id: Uuid) -> Result<Vec<RoleProfile>>;

    async fn save_profile(&self, profile: RoleProfile) -> Result<()>;

    /// All five role profiles for a user. Any role missing a stored record
    /// is materialized with [`RoleProfile::default_for`] and
    /// persisted so subsequent reads are stable.
    async fn profiles_for(&self, user_id: Uuid) -> Result<Vec<RoleProfile>> {
        let stored = self.stored_profiles(user_id).await?;
        let ladder_rating = ladder_default_rating(&stored);

        let mut by_role: HashMap<Role, RoleProfile> =
            stored.into_iter().map(|p| (p.role, p)).collect();

        for role in Role::ALL {
            if !by_role.contains_key(&role) {
                let materialized = RoleProfile::default_for(user_id, role, ladder_rating);
                self.save_profile(materialized).await?;
                by_role.insert(role, materialized);
            }
        }

        let mut profiles: Vec<RoleProfile> = by_role.into_values().collect();
        profiles.sort_by_key(|p| p.role.lane_order());
        Ok(profiles)
    }
}

/// In-memory profile store, used for tests and as the default backend when
/// no external persistence layer is wired in.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<(Uuid, Role), RoleProfile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn stored_profiles(&self, user_id: Uuid) -> Result<Vec<RoleProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .values()
            .filter(|p| p.user_id == user_id)
            .copied()
            .collect())
    }

    async fn save_profile(&self, profile: RoleProfile) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        profiles.insert((profile.user_id, profile.role), profile);
        Ok(())
    }
}
