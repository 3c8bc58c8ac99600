use crate::matchmaking::Team;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    Ban,
    Pick,
}

/// One entry of the fixed 20-phase script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPhase {
    pub index: u8,
    pub kind: PhaseKind,
    pub team: Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Waiting,
    InProgress,
    Paused,
    Completed,
}

pub const TOTAL_PHASES: usize = 20;

/// The buffer period after the timer reaches zero before
/// autoselection kicks in.
pub const BUFFER_SECS: u8 = 5;

pub const EDIT_EXPIRY_SECS: i64 = 30;
pub const RESUME_COUNTDOWN_SECS: u8 = 5;
pub const TICK_INTERVAL_MS: u64 = 1000;
