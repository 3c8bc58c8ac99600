use super::command::RoomCommand;
use super::event::RoomEvent;
use super::state::DraftState;
use super::types::{RoomStatus, TICK_INTERVAL_MS};
use crate::catalog::ChampionCatalog;
use crate::error::{DraftCoreError, Result};
use crate::persistence::draft_store::SharedDraftRepository;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Duration};
use uuid::Uuid;

const INBOX_CAPACITY: usize = 64;
const EVENT_CAPACITY: usize = 256;

/// Handle to a running room actor, grounded on the broadcast/mpsc pattern
/// used for per-entity actors. Cheap to clone; every clone shares the same
/// inbox and broadcast channel.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: Uuid,
    commands: mpsc::Sender<RoomCommand>,
    events: broadcast::Sender<RoomEvent>,
}

impl RoomHandle {
    pub fn room_id(&self) -> Uuid {
        self.room_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.events.subscribe()
    }

    async fn call<T>(&self, build: impl FnOnce(tokio::sync::oneshot::Sender<Result<T>>) -> RoomCommand) -> Result<T> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.commands
            .send(build(tx))
            .await
            .map_err(|_| DraftCoreError::RoomNotFound(self.room_id))?;
        rx.await.map_err(|_| DraftCoreError::RoomNotFound(self.room_id))?
    }

    pub async fn join_room(&self, user_id: Uuid) -> Result<DraftState> {
        self.call(|reply| RoomCommand::JoinRoom { user_id, reply }).await
    }

    pub async fn set_ready(&self, user_id: Uuid, ready: bool) -> Result<()> {
        self.call(|reply| RoomCommand::SetReady { user_id, ready, reply }).await
    }

    pub async fn start_draft(&self, user_id: Uuid) -> Result<()> {
        self.call(|reply| RoomCommand::StartDraft { user_id, reply }).await
    }

    pub async fn hover_champion(&self, user_id: Uuid, champion_id: Option<String>) -> Result<()> {
        self.call(|reply| RoomCommand::HoverChampion { user_id, champion_id, reply }).await
    }

    pub async fn select_champion(&self, user_id: Uuid, champion_id: String) -> Result<()> {
        self.call(|reply| RoomCommand::SelectChampion { user_id, champion_id, reply }).await
    }

    pub async fn lock_in(&self, user_id: Uuid) -> Result<()> {
        self.call(|reply| RoomCommand::LockIn { user_id, reply }).await
    }

    pub async fn pause_draft(&self, user_id: Uuid) -> Result<()> {
        self.call(|reply| RoomCommand::PauseDraft { user_id, reply }).await
    }

    pub async fn resume_ready(&self, user_id: Uuid, ready: bool) -> Result<()> {
        self.call(|reply| RoomCommand::ResumeReady { user_id, ready, reply }).await
    }

    pub async fn propose_edit(
        &self,
        user_id: Uuid,
        slot_type: super::types::PhaseKind,
        team: crate::matchmaking::Team,
        slot_index: usize,
        champion_id: String,
    ) -> Result<()> {
        self.call(|reply| RoomCommand::ProposeEdit {
            user_id,
            slot_type,
            team,
            slot_index,
            champion_id,
            reply,
        })
        .await
    }

    pub async fn respond_edit(&self, user_id: Uuid, accept: bool) -> Result<()> {
        self.call(|reply| RoomCommand::RespondEdit { user_id, accept, reply }).await
    }

    pub async fn snapshot(&self) -> Result<DraftState> {
        self.call(|reply| RoomCommand::Snapshot { reply }).await
    }
}

/// Single-writer actor owning one [`DraftState`]. Spawned once per
/// room; all mutation flows through its inbox, mirroring the teacher's
/// per-game-loop isolation.
pub struct RoomActor {
    state: DraftState,
    catalog: Arc<dyn ChampionCatalog>,
    repo: SharedDraftRepository,
    events: broadcast::Sender<RoomEvent>,
}

impl RoomActor {
    /// Spawns the actor and returns a handle to it.
    pub fn spawn(state: DraftState, catalog: Arc<dyn ChampionCatalog>, repo: SharedDraftRepository) -> RoomHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(INBOX_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let room_id = state.room_id;

        let actor = RoomActor {
            state,
            catalog,
            repo,
            events: event_tx.clone(),
        };
        tokio::spawn(actor.run(cmd_rx));

        RoomHandle {
            room_id,
            commands: cmd_tx,
            events: event_tx,
        }
    }

    fn emit(&self, event: RoomEvent) {
        let _ = self.events.send(event);
    }

    async fn run(mut self, mut inbox: mpsc::Receiver<RoomCommand>) {
        let mut ticker = interval(Duration::from_millis(TICK_INTERVAL_MS));
        loop {
            tokio::select! {
                cmd = inbox.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    self.handle_tick().await;
                }
            }
        }
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::JoinRoom { user_id, reply } => {
                let result = if self.state.side_of(user_id).is_some() {
                    Ok(self.state.clone())
                } else {
                    Err(DraftCoreError::Unauthorized)
                };
                if result.is_ok() {
                    self.emit(RoomEvent::StateSync(Box::new(self.state.clone())));
                }
                let _ = reply.send(result);
            }
            RoomCommand::SetReady { user_id, ready, reply } => {
                let result = self.set_ready(user_id, ready);
                let _ = reply.send(result);
            }
            RoomCommand::StartDraft { user_id, reply } => {
                let result = self.start_draft(user_id);
                let _ = reply.send(result);
            }
            RoomCommand::HoverChampion { user_id, champion_id, reply } => {
                let result = self.state.hover(user_id, champion_id.clone());
                if result.is_ok() {
                    if let Some(team) = self.state.side_of(user_id) {
                        self.emit(RoomEvent::ChampionHovered { team, champion_id });
                    }
                }
                let _ = reply.send(result);
            }
            RoomCommand::SelectChampion { user_id, champion_id, reply } => {
                let result = self.state.select_champion(user_id, champion_id.clone());
                if result.is_ok() {
                    if let Some(team) = self.state.side_of(user_id) {
                        self.emit(RoomEvent::ChampionSelected { team, champion_id });
                    }
                }
                let _ = reply.send(result);
            }
            RoomCommand::LockIn { user_id, reply } => {
                let result = self.lock_in(user_id).await;
                let _ = reply.send(result);
            }
            RoomCommand::PauseDraft { user_id, reply } => {
                let result = self.state.pause(user_id);
                match &result {
                    Ok(frozen_ms) => self.emit(RoomEvent::DraftPaused { frozen_ms: *frozen_ms }),
                    Err(_) => {}
                }
                let _ = self.persist().await;
                let _ = reply.send(result.map(|_| ()));
            }
            RoomCommand::ResumeReady { user_id, ready, reply } => {
                let result = self.state.set_resume_ready(user_id, ready);
                if result.is_ok() {
                    self.emit(RoomEvent::ResumeReadyUpdate {
                        blue: self.state.resume_ready_blue,
                        red: self.state.resume_ready_red,
                    });
                }
                let _ = reply.send(result);
            }
            RoomCommand::ProposeEdit { user_id, slot_type, team, slot_index, champion_id, reply } => {
                let result = self.state.propose_edit(user_id, slot_type, team, slot_index, champion_id.clone());
                if result.is_ok() {
                    self.emit(RoomEvent::EditProposed { team, slot_index, champion_id });
                }
                let _ = reply.send(result);
            }
            RoomCommand::RespondEdit { user_id, accept, reply } => {
                let result = self.state.respond_edit(user_id, accept);
                match &result {
                    Ok(true) => self.emit(RoomEvent::EditApplied {
                        blue_bans: self.state.blue_bans.clone(),
                        red_bans: self.state.red_bans.clone(),
                        blue_picks: self.state.blue_picks.clone(),
                        red_picks: self.state.red_picks.clone(),
                    }),
                    Ok(false) => self.emit(RoomEvent::EditRejected),
                    Err(_) => {}
                }
                let _ = self.persist().await;
                let _ = reply.send(result.map(|_| ()));
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(Ok(self.state.clone()));
            }
        }
    }

    fn set_ready(&mut self, user_id: Uuid, ready: bool) -> Result<()> {
        if self.state.status != RoomStatus::Waiting {
            return Err(DraftCoreError::InvalidRoomState("room is not waiting".into()));
        }
        match self.state.side_of(user_id).ok_or(DraftCoreError::Unauthorized)? {
            crate::matchmaking::Team::Blue => self.state.blue_ready = ready,
            crate::matchmaking::Team::Red => self.state.red_ready = ready,
        }
        self.emit(RoomEvent::PlayerUpdate { user_id, ready });
        Ok(())
    }

    fn start_draft(&mut self, user_id: Uuid) -> Result<()> {
        if self.state.status != RoomStatus::Waiting {
            return Err(DraftCoreError::InvalidRoomState("room is not waiting".into()));
        }
        if self.state.side_of(user_id).is_none() {
            return Err(DraftCoreError::Unauthorized);
        }
        if !(self.state.blue_ready && self.state.red_ready) {
            return Err(DraftCoreError::InvalidRoomState("both captains must be ready".into()));
        }
        self.state.status = RoomStatus::InProgress;
        self.state.phase_index = 0;
        self.state.timer_remaining_ms = (self.state.per_turn_timer_secs as i64) * 1000;
        self.emit(RoomEvent::DraftStarted);
        Ok(())
    }

    async fn lock_in(&mut self, user_id: Uuid) -> Result<()> {
        let action = self.state.lock_in(user_id)?;
        let _ = self.repo.append_action(action).await;
        let _ = self.persist().await;

        if self.state.is_complete() {
            self.finalize_series().await;
            self.emit(RoomEvent::DraftCompleted);
        } else {
            self.emit(RoomEvent::PhaseChanged { phase_index: self.state.phase_index });
        }
        Ok(())
    }

    /// On `DRAFT_COMPLETED`, folds this room's picks into the series'
    /// `fearlessBans` set so later games in the same series exclude them.
    async fn finalize_series(&self) {
        let Some(series_id) = self.state.series_id else {
            return;
        };
        let mut series = self.repo.load_series(series_id).await.unwrap_or_else(|_| {
            let mut s = super::Series::new();
            s.id = series_id;
            s
        });
        let picks = self.state.blue_picks.iter().chain(&self.state.red_picks).cloned();
        series.record_completed_room(self.state.room_id, picks);
        let _ = self.repo.save_series(&series).await;
    }

    async fn handle_tick(&mut self) {
        if self.state.expire_pending_edit_if_due() {
            self.emit(RoomEvent::EditRejected);
        }

        match self.state.status {
            RoomStatus::InProgress => self.tick_timer().await,
            RoomStatus::Paused => self.tick_resume_countdown(),
            _ => {}
        }
    }

    async fn tick_timer(&mut self) {
        if self.state.buffering {
            if self.state.buffer_remaining_secs == 0 {
                self.autoselect_and_advance().await;
            } else {
                self.state.buffer_remaining_secs -= 1;
                self.emit(RoomEvent::TimerTick { remaining_ms: 0 });
            }
            return;
        }

        if self.state.timer_remaining_ms <= TICK_INTERVAL_MS as i64 {
            self.state.timer_remaining_ms = 0;
            self.state.buffering = true;
            self.state.buffer_remaining_secs = super::types::BUFFER_SECS;
            self.emit(RoomEvent::TimerTick { remaining_ms: 0 });
        } else {
            self.state.timer_remaining_ms -= TICK_INTERVAL_MS as i64;
            self.emit(RoomEvent::TimerTick { remaining_ms: self.state.timer_remaining_ms });
        }
    }

    fn tick_resume_countdown(&mut self) {
        let Some(remaining) = self.state.resume_countdown_remaining else {
            return;
        };
        if remaining == 0 {
            self.state.resume();
            self.emit(RoomEvent::DraftResumed { remaining_ms: self.state.timer_remaining_ms });
        } else {
            self.state.resume_countdown_remaining = Some(remaining - 1);
            self.emit(RoomEvent::ResumeCountdown { remaining_secs: remaining - 1 });
        }
    }

    async fn autoselect_and_advance(&mut self) {
        let catalog_ids = self.catalog.all_champion_ids().await;
        let phase = match self.state.current_phase() {
            Some(p) => p,
            None => return,
        };
        let champion_id = self.state.autoselect_champion(&catalog_ids);
        let current_turn = self.state.captain_for(phase.team);

        if let Some(champion_id) = champion_id {
            if self.state.select_champion(current_turn, champion_id).is_ok() {
                let _ = self.lock_in(current_turn).await;
            }
        }
    }

    async fn persist(&self) -> Result<()> {
        self.repo.save_room(&self.state).await
    }
}
