use super::types::PhaseKind;
use crate::matchmaking::Team;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An append-only log row written on every `lock_in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAction {
    pub id: Uuid,
    pub room_id: Uuid,
    pub phase_index: u8,
    pub team: Team,
    pub kind: PhaseKind,
    pub champion_id: String,
    pub created_at: DateTime<Utc>,
}

impl DraftAction {
    pub fn new(room_id: Uuid, phase_index: u8, team: Team, kind: PhaseKind, champion_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            phase_index,
            team,
            kind,
            champion_id,
            created_at: Utc::now(),
        }
    }
}
