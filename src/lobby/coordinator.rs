use super::pending_action::{ActionKind, ActionStatus, PendingAction};
use super::store::SharedLobbyRepository;
use super::types::{validate_turn_timer, LobbyStatus, VotingConfig};
use super::vote::VoteTally;
use super::{generate_short_code, Lobby};
use crate::error::{DraftCoreError, Result};
use crate::matchmaking::{MatchmakingEngine, PlayerProfiles, Team};
use crate::profile::ProfileStore;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

const SHORT_CODE_RETRIES: usize = 10;

/// What a lobby hands to the draft component once a room is spawned, via
/// `propose_start_draft`. Kept in the lobby module (not draft) so
/// draft has no compile-time dependency back on lobby/matchmaking types.
#[derive(Debug, Clone)]
pub struct RoomSeed {
    pub lobby_id: Uuid,
    pub series_id: Option<Uuid>,
    pub draft_mode: crate::lobby::types::DraftMode,
    pub per_turn_timer_secs: u32,
    pub blue_captain: Uuid,
    pub red_captain: Uuid,
    pub rosters: Vec<(Uuid, Team, crate::profile::Role)>,
}

/// Decouples lobby-driven room creation from the draft actor's
/// implementation. Implemented by the hub/draft wiring, injected here.
#[async_trait::async_trait]
pub trait RoomSpawner: Send + Sync {
    async fn spawn_room(&self, seed: RoomSeed) -> Result<Uuid>;
}

/// Lobby orchestration. Holds a per-lobby lock map so that
/// invariant checks and writes are atomic against concurrent proposals and
/// joins, adapted here to explicit locking since lobby mutations are
/// request/response rather than actor-owned.
pub struct LobbyCoordinator {
    repo: SharedLobbyRepository,
    profiles: Arc<dyn ProfileStore>,
    rooms: Arc<dyn RoomSpawner>,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl LobbyCoordinator {
    pub fn new(
        repo: SharedLobbyRepository,
        profiles: Arc<dyn ProfileStore>,
        rooms: Arc<dyn RoomSpawner>,
    ) -> Self {
        Self {
            repo,
            profiles,
            rooms,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, lobby_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .await
            .entry(lobby_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        draft_mode: crate::lobby::types::DraftMode,
        voting: VotingConfig,
    ) -> Result<Lobby> {
        let mut short_code = generate_short_code();
        for _ in 0..SHORT_CODE_RETRIES {
            if self.repo.load_by_short_code(&short_code).await.is_err() {
                break;
            }
            short_code = generate_short_code();
        }
        let lobby = Lobby::new(creator_id, short_code, draft_mode, voting);
        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    pub async fn join(&self, lobby_id: Uuid, user_id: Uuid) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        lobby.require_status(&[LobbyStatus::WaitingForPlayers])?;
        if lobby.is_full() {
            return Err(DraftCoreError::Full);
        }
        if lobby.find_player(user_id).is_some() {
            return Ok(lobby);
        }

        let join_order = lobby.players.len() as u32;
        let mut player = super::player::LobbyPlayer::new(user_id, join_order);

        let blue = lobby.team_count(Team::Blue);
        let team = if blue < 5 { Team::Blue } else { Team::Red };
        player.team = Some(team);
        player.is_captain = lobby.captain_of(team).is_none();

        lobby.players.push(player);
        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    pub async fn leave(&self, lobby_id: Uuid, user_id: Uuid) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        lobby.require_status(&[LobbyStatus::WaitingForPlayers])?;
        let leaver = lobby.require_player(user_id)?.clone();

        lobby.players.retain(|p| p.user_id != user_id);

        if leaver.is_captain {
            if let Some(team) = leaver.team {
                if let Some(next) = lobby
                    .players
                    .iter_mut()
                    .filter(|p| p.team == Some(team))
                    .min_by_key(|p| p.join_order)
                {
                    next.is_captain = true;
                }
            }
        }

        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    pub async fn set_ready(&self, lobby_id: Uuid, user_id: Uuid, ready: bool) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        lobby.require_status(&[LobbyStatus::WaitingForPlayers])?;
        lobby
            .find_player_mut(user_id)
            .ok_or(DraftCoreError::NotInLobby)?
            .is_ready = ready;

        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    pub async fn take_captain(&self, lobby_id: Uuid, user_id: Uuid) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        lobby.require_status(&[
            LobbyStatus::WaitingForPlayers,
            LobbyStatus::Matchmaking,
            LobbyStatus::TeamSelected,
        ])?;
        let team = lobby.require_player(user_id)?.team.ok_or(DraftCoreError::NotInLobby)?;

        for p in lobby.players.iter_mut().filter(|p| p.team == Some(team)) {
            p.is_captain = p.user_id == user_id;
        }

        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    pub async fn promote_captain(
        &self,
        lobby_id: Uuid,
        requester: Uuid,
        target: Uuid,
    ) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        let team = lobby.require_any_captain(requester)?;
        if target == requester {
            return Err(DraftCoreError::CannotKickSelf);
        }
        let target_team = lobby.require_player(target)?.team;
        if target_team != Some(team) {
            return Err(DraftCoreError::InvalidInput(
                "promotion target must be on the same team".into(),
            ));
        }

        for p in lobby.players.iter_mut().filter(|p| p.team == Some(team)) {
            p.is_captain = p.user_id == target;
        }

        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    pub async fn kick_player(
        &self,
        lobby_id: Uuid,
        requester: Uuid,
        target: Uuid,
    ) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        lobby.require_status(&[LobbyStatus::WaitingForPlayers])?;
        let team = lobby.require_any_captain(requester)?;
        if target == requester {
            return Err(DraftCoreError::CannotKickSelf);
        }
        let target_team = lobby.require_player(target)?.team;
        if target_team != Some(team) {
            return Err(DraftCoreError::InvalidInput(
                "kick target must be on the same team".into(),
            ));
        }

        lobby.players.retain(|p| p.user_id != target);
        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    /// Materializes each player's five role profiles, runs the
    /// matchmaking engine, and stores the batch on the lobby.
    pub async fn generate_teams(&self, lobby_id: Uuid, requester: Uuid, seed: u64) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        lobby.require_status(&[LobbyStatus::WaitingForPlayers, LobbyStatus::Matchmaking])?;
        lobby.require_any_captain(requester)?;
        if lobby.players.len() != 10 {
            return Err(DraftCoreError::NotEnoughPlayers(lobby.players.len()));
        }
        if !lobby.players.iter().all(|p| p.is_ready) {
            return Err(DraftCoreError::PlayersNotReady);
        }

        let mut players = Vec::with_capacity(10);
        for p in &lobby.players {
            let profiles = self.profiles.profiles_for(p.user_id).await?;
            players.push(PlayerProfiles::from_role_profiles(p.user_id, &profiles)?);
        }

        let batch = MatchmakingEngine::generate(&players, seed, crate::matchmaking::DEFAULT_OPTION_COUNT)?;
        lobby.match_options = batch.options;
        lobby.transition_to(LobbyStatus::Matchmaking)?;
        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    // -- two-captain consensus protocol --

    async fn propose(
        &self,
        lobby_id: Uuid,
        proposer: Uuid,
        action: ActionKind,
        allowed: &[LobbyStatus],
    ) -> Result<PendingAction> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let lobby = self.repo.load_lobby(lobby_id).await?;
        lobby.require_status(allowed)?;
        let side = lobby.require_any_captain(proposer)?;

        if let Some(existing) = self.repo.load_pending_action(lobby_id).await? {
            if !existing.is_expired_at(Utc::now()) && existing.status == ActionStatus::Pending {
                return Err(DraftCoreError::PendingActionExists);
            }
        }

        let action = PendingAction::propose(lobby_id, action, proposer, side);
        self.repo.save_pending_action(action.clone()).await?;
        Ok(action)
    }

    async fn approve(&self, lobby_id: Uuid, approver: Uuid) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        let side = lobby.require_any_captain(approver)?;

        let mut pending = self
            .repo
            .load_pending_action(lobby_id)
            .await?
            .ok_or(DraftCoreError::InvalidState("no pending action".into()))?;

        let now = Utc::now();
        if pending.is_expired_at(now) {
            pending.status = ActionStatus::Expired;
            self.repo.save_pending_action(pending).await?;
            return Err(DraftCoreError::ActionExpired);
        }
        if pending.status != ActionStatus::Pending {
            return Err(DraftCoreError::InvalidState("pending action is not pending".into()));
        }
        if side == pending.proposer_side {
            return Err(DraftCoreError::NotCaptain);
        }

        pending.approve(side);
        if !pending.both_approved() {
            self.repo.save_pending_action(pending).await?;
            return Ok(lobby);
        }

        self.apply_action(&mut lobby, &pending.action).await?;
        pending.status = ActionStatus::Approved;
        self.repo.save_pending_action(pending).await?;
        self.repo.clear_pending_action(lobby_id).await?;
        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    async fn cancel(&self, lobby_id: Uuid, requester: Uuid) -> Result<()> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut pending = self
            .repo
            .load_pending_action(lobby_id)
            .await?
            .ok_or(DraftCoreError::InvalidState("no pending action".into()))?;
        if pending.proposer != requester {
            return Err(DraftCoreError::Unauthorized);
        }
        pending.status = ActionStatus::Rejected;
        self.repo.save_pending_action(pending).await?;
        self.repo.clear_pending_action(lobby_id).await?;
        Ok(())
    }

    async fn apply_action(&self, lobby: &mut Lobby, action: &ActionKind) -> Result<()> {
        match action {
            ActionKind::SwapPlayers { a, b } => {
                let team_a = lobby.require_player(*a)?.team;
                let team_b = lobby.require_player(*b)?.team;
                lobby.find_player_mut(*a).unwrap().team = team_b;
                lobby.find_player_mut(*b).unwrap().team = team_a;
            }
            ActionKind::SwapRoles { team: _, a, b } => {
                let role_a = lobby.require_player(*a)?.assigned_role;
                let role_b = lobby.require_player(*b)?.assigned_role;
                lobby.find_player_mut(*a).unwrap().assigned_role = role_b;
                lobby.find_player_mut(*b).unwrap().assigned_role = role_a;
            }
            ActionKind::Matchmake => {
                lobby.transition_to(LobbyStatus::Matchmaking)?;
            }
            ActionKind::SelectOption { option_number } => {
                self.apply_select_option(lobby, *option_number)?;
            }
            ActionKind::StartDraft => {
                self.start_draft(lobby).await?;
            }
        }
        Ok(())
    }

    fn apply_select_option(&self, lobby: &mut Lobby, option_number: i32) -> Result<()> {
        let option = lobby
            .match_options
            .iter()
            .find(|o| o.option_number == option_number)
            .cloned()
            .ok_or(DraftCoreError::InvalidMatchOption(option_number))?;

        for assignment in &option.assignments {
            if let Some(p) = lobby.find_player_mut(assignment.user_id) {
                p.team = Some(assignment.team);
                p.assigned_role = Some(assignment.role);
            }
        }
        for team in [Team::Blue, Team::Red] {
            if let Some(captain_id) = option.default_captain(team) {
                for p in lobby.players.iter_mut().filter(|p| p.team == Some(team)) {
                    p.is_captain = p.user_id == captain_id;
                }
            }
        }

        lobby.selected_option_number = Some(option_number);
        lobby.transition_to(LobbyStatus::TeamSelected)?;
        Ok(())
    }

    async fn start_draft(&self, lobby: &mut Lobby) -> Result<()> {
        let blue_captain = lobby
            .captain_of(Team::Blue)
            .map(|p| p.user_id)
            .ok_or(DraftCoreError::InvalidState("no blue captain".into()))?;
        let red_captain = lobby
            .captain_of(Team::Red)
            .map(|p| p.user_id)
            .ok_or(DraftCoreError::InvalidState("no red captain".into()))?;

        let rosters = lobby
            .players
            .iter()
            .map(|p| {
                (
                    p.user_id,
                    p.team.expect("team selected before start_draft"),
                    p.assigned_role.expect("role selected before start_draft"),
                )
            })
            .collect();

        let room_id = self
            .rooms
            .spawn_room(RoomSeed {
                lobby_id: lobby.id,
                series_id: lobby.series_id,
                draft_mode: lobby.draft_mode,
                per_turn_timer_secs: lobby.per_turn_timer_secs,
                blue_captain,
                red_captain,
                rosters,
            })
            .await?;

        lobby.room_id = Some(room_id);
        lobby.transition_to(LobbyStatus::Drafting)?;
        Ok(())
    }

    pub async fn propose_select_option(
        &self,
        lobby_id: Uuid,
        proposer: Uuid,
        option_number: i32,
    ) -> Result<PendingAction> {
        self.propose(
            lobby_id,
            proposer,
            ActionKind::SelectOption { option_number },
            &[LobbyStatus::Matchmaking],
        )
        .await
    }

    pub async fn propose_start_draft(&self, lobby_id: Uuid, proposer: Uuid) -> Result<PendingAction> {
        self.propose(
            lobby_id,
            proposer,
            ActionKind::StartDraft,
            &[LobbyStatus::TeamSelected],
        )
        .await
    }

    pub async fn propose_swap_players(
        &self,
        lobby_id: Uuid,
        proposer: Uuid,
        a: Uuid,
        b: Uuid,
    ) -> Result<PendingAction> {
        self.propose(
            lobby_id,
            proposer,
            ActionKind::SwapPlayers { a, b },
            &[LobbyStatus::Matchmaking, LobbyStatus::TeamSelected],
        )
        .await
    }

    pub async fn propose_swap_roles(
        &self,
        lobby_id: Uuid,
        proposer: Uuid,
        team: Team,
        a: Uuid,
        b: Uuid,
    ) -> Result<PendingAction> {
        self.propose(
            lobby_id,
            proposer,
            ActionKind::SwapRoles { team, a, b },
            &[LobbyStatus::TeamSelected],
        )
        .await
    }

    pub async fn propose_matchmake(&self, lobby_id: Uuid, proposer: Uuid) -> Result<PendingAction> {
        self.propose(
            lobby_id,
            proposer,
            ActionKind::Matchmake,
            &[LobbyStatus::TeamSelected],
        )
        .await
    }

    pub async fn approve_pending(&self, lobby_id: Uuid, approver: Uuid) -> Result<Lobby> {
        self.approve(lobby_id, approver).await
    }

    pub async fn cancel_pending(&self, lobby_id: Uuid, requester: Uuid) -> Result<()> {
        self.cancel(lobby_id, requester).await
    }

    /// Marks any pending action whose `expiresAt` has passed.
    pub async fn expire_if_due(&self, lobby_id: Uuid) -> Result<()> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        if let Some(mut pending) = self.repo.load_pending_action(lobby_id).await? {
            if pending.status == ActionStatus::Pending && pending.is_expired_at(Utc::now()) {
                pending.status = ActionStatus::Expired;
                self.repo.save_pending_action(pending).await?;
                self.repo.clear_pending_action(lobby_id).await?;
            }
        }
        Ok(())
    }

    // -- voting --

    pub async fn cast_vote(&self, lobby_id: Uuid, user_id: Uuid, option_number: i32) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        if !lobby.voting.enabled {
            return Err(DraftCoreError::VotingNotEnabled);
        }
        if !lobby.voting_round_open {
            return Err(DraftCoreError::VotingRoundClosed);
        }
        lobby.require_player(user_id)?;
        if !lobby.match_options.iter().any(|o| o.option_number == option_number) {
            return Err(DraftCoreError::InvalidMatchOption(option_number));
        }

        lobby.votes.toggle(user_id, option_number);
        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    pub async fn voting_status(&self, lobby_id: Uuid) -> Result<VoteTally> {
        let lobby = self.repo.load_lobby(lobby_id).await?;
        if !lobby.voting.enabled {
            return Err(DraftCoreError::VotingNotEnabled);
        }
        Ok(lobby.votes.tally(lobby.voting.mode, lobby.players.len()))
    }

    pub async fn open_voting(&self, lobby_id: Uuid, requester: Uuid) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        if !lobby.voting.enabled {
            return Err(DraftCoreError::VotingNotEnabled);
        }
        lobby.require_any_captain(requester)?;
        lobby.require_status(&[LobbyStatus::Matchmaking])?;
        lobby.voting_round_open = true;
        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }

    /// Captain-only; finalizes the winner (or a forced option under
    /// `captain_override`), equivalent to an approved `select_option`.
    pub async fn end_voting(
        &self,
        lobby_id: Uuid,
        requester: Uuid,
        forced_option: Option<i32>,
    ) -> Result<Lobby> {
        let guard = self.lock_for(lobby_id).await;
        let _permit = guard.lock().await;

        let mut lobby = self.repo.load_lobby(lobby_id).await?;
        if !lobby.voting.enabled {
            return Err(DraftCoreError::VotingNotEnabled);
        }
        if !lobby.voting_round_open {
            return Err(DraftCoreError::VotingRoundClosed);
        }
        lobby.require_any_captain(requester)?;

        let tally = lobby.votes.tally(lobby.voting.mode, lobby.players.len());
        let winner = match lobby.voting.mode {
            crate::lobby::types::VotingMode::CaptainOverride => forced_option.or(tally.winning_option),
            _ => {
                if !tally.can_finalize {
                    return Err(DraftCoreError::InvalidState(
                        "voting condition not yet satisfied".into(),
                    ));
                }
                tally.winning_option
            }
        }
        .ok_or(DraftCoreError::InvalidState("no votes cast".into()))?;

        self.apply_select_option(&mut lobby, winner)?;
        lobby.voting_round_open = false;
        self.repo.save_lobby(lobby.clone()).await?;
        Ok(lobby)
    }
}
