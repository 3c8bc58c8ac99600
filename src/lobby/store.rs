use super::{Lobby, PendingAction};
use crate::error::{DraftCoreError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Persistence boundary for lobbies and their pending proposals.
/// A `PendingAction` is stored keyed by lobby id: at most one per lobby, so
/// `save_pending_action` simply overwrites.
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    async fn save_lobby(&self, lobby: Lobby) -> Result<()>;
    async fn load_lobby(&self, id: Uuid) -> Result<Lobby>;
    async fn load_by_short_code(&self, short_code: &str) -> Result<Lobby>;
    async fn delete_lobby(&self, id: Uuid) -> Result<()>;

    async fn save_pending_action(&self, action: PendingAction) -> Result<()>;
    async fn load_pending_action(&self, lobby_id: Uuid) -> Result<Option<PendingAction>>;
    async fn clear_pending_action(&self, lobby_id: Uuid) -> Result<()>;

    /// All lobbies currently tracked. Backs the hub's per-user "pending
    /// actions for me" aggregation; a real backend would
    /// index this by captain rather than scanning every row.
    async fn all_lobbies(&self) -> Result<Vec<Lobby>>;
}

#[derive(Default)]
pub struct InMemoryLobbyRepository {
    lobbies: RwLock<HashMap<Uuid, Lobby>>,
    pending: RwLock<HashMap<Uuid, PendingAction>>,
}

impl InMemoryLobbyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn save_lobby(&self, lobby: Lobby) -> Result<()> {
        self.lobbies.write().await.insert(lobby.id, lobby);
        Ok(())
    }

    async fn load_lobby(&self, id: Uuid) -> Result<Lobby> {
        self.lobbies
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DraftCoreError::LobbyNotFound(id))
    }

    async fn load_by_short_code(&self, short_code: &str) -> Result<Lobby> {
        self.lobbies
            .read()
            .await
            .values()
            .find(|l| l.short_code == short_code)
            .cloned()
            .ok_or_else(|| DraftCoreError::InvalidInput(format!("no lobby with code {short_code}")))
    }

    async fn delete_lobby(&self, id: Uuid) -> Result<()> {
        self.lobbies.write().await.remove(&id);
        self.pending.write().await.remove(&id);
        Ok(())
    }

    async fn save_pending_action(&self, action: PendingAction) -> Result<()> {
        self.pending.write().await.insert(action.lobby_id, action);
        Ok(())
    }

    async fn load_pending_action(&self, lobby_id: Uuid) -> Result<Option<PendingAction>> {
        Ok(self.pending.read().await.get(&lobby_id).cloned())
    }

    async fn clear_pending_action(&self, lobby_id: Uuid) -> Result<()> {
        self.pending.write().await.remove(&lobby_id);
        Ok(())
    }

    async fn all_lobbies(&self) -> Result<Vec<Lobby>> {
        Ok(self.lobbies.read().await.values().cloned().collect())
    }
}

pub type SharedLobbyRepository = Arc<dyn LobbyRepository>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lobby::types::{DraftMode, VotingConfig};

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = InMemoryLobbyRepository::new();
        let lobby = Lobby::new(
            Uuid::new_v4(),
            "abc12345".into(),
            DraftMode::Standard,
            VotingConfig::default(),
        );
        let id = lobby.id;
        repo.save_lobby(lobby).await.unwrap();
        let loaded = repo.load_lobby(id).await.unwrap();
        assert_eq!(loaded.id, id);
    }

    #[tokio::test]
    async fn missing_lobby_errors() {
        let repo = InMemoryLobbyRepository::new();
        let err = repo.load_lobby(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DraftCoreError::LobbyNotFound(_)));
    }

    #[tokio::test]
    async fn load_by_short_code_finds_match() {
        let repo = InMemoryLobbyRepository::new();
        let lobby = Lobby::new(
            Uuid::new_v4(),
            "deadbeef".into(),
            DraftMode::Standard,
            VotingConfig::default(),
        );
        repo.save_lobby(lobby).await.unwrap();
        let loaded = repo.load_by_short_code("deadbeef").await.unwrap();
        assert_eq!(loaded.short_code, "deadbeef");
    }
}
