use super::state::DraftState;
use crate::matchmaking::Team;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outbound events fanned out to subscribers through the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoomEvent {
    StateSync(Box<DraftState>),
    PlayerUpdate { user_id: Uuid, ready: bool },
    DraftStarted,
    PhaseChanged { phase_index: usize },
    ChampionSelected { team: Team, champion_id: String },
    ChampionHovered { team: Team, champion_id: Option<String> },
    TimerTick { remaining_ms: i64 },
    DraftPaused { frozen_ms: i64 },
    DraftResumed { remaining_ms: i64 },
    ResumeReadyUpdate { blue: bool, red: bool },
    ResumeCountdown { remaining_secs: u8 },
    EditProposed { team: Team, slot_index: usize, champion_id: String },
    EditApplied { blue_bans: Vec<String>, red_bans: Vec<String>, blue_picks: Vec<String>, red_picks: Vec<String> },
    EditRejected,
    DraftCompleted,
    Error { message: String },
}
