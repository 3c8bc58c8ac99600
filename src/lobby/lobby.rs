use super::player::LobbyPlayer;
use super::types::{DraftMode, LobbyStatus, VotingConfig, DEFAULT_TURN_TIMER_SECS};
use super::vote::VoteBoard;
use crate::error::{DraftCoreError, Result};
use crate::matchmaking::{MatchOption, Team};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_PLAYERS: usize = 10;
pub const SHORT_CODE_LEN: usize = 8;

/// A lobby. Owns membership, readiness, captain designation, the
/// generated match options, and voting state. Proposal rows
/// ([`super::PendingAction`]) live alongside it in the repository, keyed by
/// lobby id, so that "at most one pending proposal" can be enforced with a
/// single check-then-insert under the lobby's lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lobby {
    pub id: Uuid,
    pub short_code: String,
    pub creator_id: Uuid,
    pub status: LobbyStatus,
    pub draft_mode: DraftMode,
    pub per_turn_timer_secs: u32,
    pub selected_option_number: Option<i32>,
    pub voting: VotingConfig,
    pub players: Vec<LobbyPlayer>,
    pub room_id: Option<Uuid>,
    /// Links games of a fearless series together. `None`
    /// in `standard` mode, or for the first game of a `fearless` series.
    pub series_id: Option<Uuid>,
    pub match_options: Vec<MatchOption>,
    pub votes: VoteBoard,
    pub voting_round_open: bool,
    pub created_at: DateTime<Utc>,
}

impl Lobby {
    pub fn new(
        creator_id: Uuid,
        short_code: String,
        draft_mode: DraftMode,
        voting: VotingConfig,
    ) -> Self {
        let mut creator = LobbyPlayer::new(creator_id, 0);
        creator.team = Some(Team::Blue);
        creator.is_captain = true;

        Self {
            id: Uuid::new_v4(),
            short_code,
            creator_id,
            status: LobbyStatus::WaitingForPlayers,
            draft_mode,
            per_turn_timer_secs: DEFAULT_TURN_TIMER_SECS,
            selected_option_number: None,
            voting,
            players: vec![creator],
            room_id: None,
            series_id: None,
            match_options: Vec::new(),
            votes: VoteBoard::new(),
            voting_round_open: false,
            created_at: Utc::now(),
        }
    }

    pub fn transition_to(&mut self, new_status: LobbyStatus) -> Result<()> {
        if !self.status.can_transition_to(new_status) {
            return Err(DraftCoreError::InvalidState(format!(
                "cannot transition from {:?} to {:?}",
                self.status, new_status
            )));
        }
        self.status = new_status;
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    pub fn find_player(&self, user_id: Uuid) -> Option<&LobbyPlayer> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    pub fn find_player_mut(&mut self, user_id: Uuid) -> Option<&mut LobbyPlayer> {
        self.players.iter_mut().find(|p| p.user_id == user_id)
    }

    pub fn require_player(&self, user_id: Uuid) -> Result<&LobbyPlayer> {
        self.find_player(user_id).ok_or(DraftCoreError::NotInLobby)
    }

    pub fn captain_of(&self, team: Team) -> Option<&LobbyPlayer> {
        self.players
            .iter()
            .find(|p| p.is_captain && p.team == Some(team))
    }

    /// Errors with [`DraftCoreError::NotCaptain`] unless `user_id` captains
    /// `team`.
    pub fn require_captain_of(&self, user_id: Uuid, team: Team) -> Result<()> {
        match self.captain_of(team) {
            Some(p) if p.user_id == user_id => Ok(()),
            _ => Err(DraftCoreError::NotCaptain),
        }
    }

    /// Errors with [`DraftCoreError::NotCaptain`] unless `user_id` captains
    /// either team; returns the side they captain.
    pub fn require_any_captain(&self, user_id: Uuid) -> Result<Team> {
        for team in [Team::Blue, Team::Red] {
            if self.captain_of(team).map(|p| p.user_id) == Some(user_id) {
                return Ok(team);
            }
        }
        Err(DraftCoreError::NotCaptain)
    }

    pub fn team_count(&self, team: Team) -> usize {
        self.players.iter().filter(|p| p.team == Some(team)).count()
    }

    pub fn all_ready(&self) -> bool {
        self.players.len() == MAX_PLAYERS && self.players.iter().all(|p| p.is_ready)
    }

    /// Attaches this lobby to a fearless series so the spawned room inherits
    /// its accumulated bans. Only meaningful in `fearless` mode; callers
    /// decide when a lobby continues an existing series vs. starting one.
    pub fn join_series(&mut self, series_id: Uuid) {
        self.series_id = Some(series_id);
    }

    pub fn require_status(&self, allowed: &[LobbyStatus]) -> Result<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(DraftCoreError::InvalidState(format!(
                "operation not allowed in status {:?}",
                self.status
            )))
        }
    }
}

/// Generates a random 8-hex-char short code. Uniqueness is enforced by the
/// caller retrying against the repository.
pub fn generate_short_code() -> String {
    let mut rng = rand::thread_rng();
    (0..SHORT_CODE_LEN)
        .map(|_| {
            let n: u8 = rng.gen_range(0..16);
            std::char::from_digit(n as u32, 16).unwrap()
        })
        .collect()
}
