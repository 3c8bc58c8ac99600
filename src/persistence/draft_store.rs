use crate::draft::{DraftAction, DraftState, Series};
use crate::error::{DraftCoreError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Persistence boundary for draft rooms: snapshots, the append-only action
/// log, and fearless series linkage.
#[async_trait]
pub trait DraftRepository: Send + Sync {
    async fn save_room(&self, state: &DraftState) -> Result<()>;
    async fn load_room(&self, room_id: Uuid) -> Result<DraftState>;
    async fn append_action(&self, action: DraftAction) -> Result<()>;
    async fn actions_for_room(&self, room_id: Uuid) -> Result<Vec<DraftAction>>;

    async fn save_series(&self, series: &Series) -> Result<()>;
    async fn load_series(&self, series_id: Uuid) -> Result<Series>;
}

#[derive(Default)]
pub struct InMemoryDraftRepository {
    rooms: RwLock<HashMap<Uuid, DraftState>>,
    actions: RwLock<Vec<DraftAction>>,
    series: RwLock<HashMap<Uuid, Series>>,
}

impl InMemoryDraftRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftRepository for InMemoryDraftRepository {
    async fn save_room(&self, state: &DraftState) -> Result<()> {
        self.rooms.write().await.insert(state.room_id, state.clone());
        Ok(())
    }

    async fn load_room(&self, room_id: Uuid) -> Result<DraftState> {
        self.rooms
            .read()
            .await
            .get(&room_id)
            .cloned()
            .ok_or(DraftCoreError::RoomNotFound(room_id))
    }

    async fn append_action(&self, action: DraftAction) -> Result<()> {
        self.actions.write().await.push(action);
        Ok(())
    }

    async fn actions_for_room(&self, room_id: Uuid) -> Result<Vec<DraftAction>> {
        Ok(self
            .actions
            .read()
            .await
            .iter()
            .filter(|a| a.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn save_series(&self, series: &Series) -> Result<()> {
        self.series.write().await.insert(series.id, series.clone());
        Ok(())
    }

    async fn load_series(&self, series_id: Uuid) -> Result<Series> {
        self.series
            .read()
            .await
            .get(&series_id)
            .cloned()
            .ok_or_else(|| DraftCoreError::InvalidInput(format!("no series {series_id}")))
    }
}

pub type SharedDraftRepository = Arc<dyn DraftRepository>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchmaking::Team;
    use std::collections::HashSet;

    #[tokio::test]
    async fn save_then_load_room_round_trips() {
        let repo = InMemoryDraftRepository::new();
        let state = DraftState::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            crate::lobby::DraftMode::Standard,
            Uuid::new_v4(),
            Uuid::new_v4(),
            30,
            HashSet::new(),
        );
        let room_id = state.room_id;
        repo.save_room(&state).await.unwrap();
        let loaded = repo.load_room(room_id).await.unwrap();
        assert_eq!(loaded.room_id, room_id);
    }

    #[tokio::test]
    async fn actions_filter_by_room() {
        let repo = InMemoryDraftRepository::new();
        let room_a = Uuid::new_v4();
        let room_b = Uuid::new_v4();
        repo.append_action(DraftAction::new(room_a, 0, Team::Blue, crate::draft::PhaseKind::Ban, "ahri".into()))
            .await
            .unwrap();
        repo.append_action(DraftAction::new(room_b, 0, Team::Blue, crate::draft::PhaseKind::Ban, "zed".into()))
            .await
            .unwrap();
        let actions = repo.actions_for_room(room_a).await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].champion_id, "ahri");
    }
}
