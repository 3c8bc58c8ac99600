use serde::{Deserialize, Serialize};

/// Lobby lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LobbyStatus {
    WaitingForPlayers,
    Matchmaking,
    TeamSelected,
    Drafting,
    Completed,
}

impl LobbyStatus {
    pub fn can_transition_to(&self, new: LobbyStatus) -> bool {
        use LobbyStatus::*;
        matches!(
            (self, new),
            (WaitingForPlayers, Matchmaking)
                | (Matchmaking, Matchmaking) // generate_teams may be re-run to reroll options
                | (Matchmaking, WaitingForPlayers) // generate_teams may be re-run after a swap/leave
                | (Matchmaking, TeamSelected)
                | (TeamSelected, Matchmaking) // matchmake proposal can re-roll before drafting
                | (TeamSelected, Drafting)
                | (Drafting, Completed)
        )
    }
}

/// `standard` has no cross-game constraints; `fearless` carries bans across
/// games of the same series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftMode {
    Standard,
    Fearless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingMode {
    Majority,
    Unanimous,
    CaptainOverride,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VotingConfig {
    pub enabled: bool,
    pub mode: VotingMode,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: VotingMode::Majority,
        }
    }
}

/// Wire constants.
pub const DEFAULT_TURN_TIMER_SECS: u32 = 30;
pub const MIN_TURN_TIMER_SECS: u32 = 10;
pub const MAX_TURN_TIMER_SECS: u32 = 120;
pub const PROPOSAL_EXPIRY_SECS: i64 = 300;
pub const EDIT_EXPIRY_SECS: i64 = 30;
pub const RESUME_COUNTDOWN_SECS: i64 = 5;

pub fn validate_turn_timer(secs: u32) -> crate::error::Result<()> {
    if (MIN_TURN_TIMER_SECS..=MAX_TURN_TIMER_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(crate::error::DraftCoreError::InvalidInput(format!(
            "per-turn timer must be in [{MIN_TURN_TIMER_SECS},{MAX_TURN_TIMER_SECS}], got {secs}"
        )))
    }
}
