use crate::matchmaking::Team;
use crate::profile::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single member of a lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyPlayer {
    pub user_id: Uuid,
    pub team: Option<Team>,
    pub assigned_role: Option<Role>,
    pub is_ready: bool,
    pub is_captain: bool,
    pub join_order: u32,
}

impl LobbyPlayer {
    pub fn new(user_id: Uuid, join_order: u32) -> Self {
        Self {
            user_id,
            team: None,
            assigned_role: None,
            is_ready: false,
            is_captain: false,
            join_order,
        }
    }
}
