use super::phase_script::standard_script;
use super::types::{DraftPhase, PhaseKind, RoomStatus, EDIT_EXPIRY_SECS, TOTAL_PHASES};
use crate::error::{DraftCoreError, Result};
use crate::lobby::DraftMode;
use crate::matchmaking::Team;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingEdit {
    pub proposer_side: Team,
    pub slot_type: PhaseKind,
    pub team: Team,
    pub slot_index: usize,
    pub champion_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PendingEdit {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A draft room's full state. Owned exclusively by its actor;
/// mutated only through the methods here, called from the actor's inbox
/// handling loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftState {
    pub room_id: Uuid,
    pub lobby_id: Uuid,
    pub series_id: Option<Uuid>,
    pub draft_mode: DraftMode,
    pub status: RoomStatus,
    pub blue_captain: Uuid,
    pub red_captain: Uuid,
    pub blue_ready: bool,
    pub red_ready: bool,
    pub script: Vec<DraftPhase>,
    pub phase_index: usize,
    pub blue_bans: Vec<String>,
    pub red_bans: Vec<String>,
    pub blue_picks: Vec<String>,
    pub red_picks: Vec<String>,
    pub pending_selection: Option<String>,
    pub hovered_champion: Option<String>,
    pub per_turn_timer_secs: u32,
    pub timer_remaining_ms: i64,
    pub buffering: bool,
    pub buffer_remaining_secs: u8,
    pub paused_frozen_ms: Option<i64>,
    pub resume_ready_blue: bool,
    pub resume_ready_red: bool,
    pub resume_countdown_remaining: Option<u8>,
    pub pending_edit: Option<PendingEdit>,
    pub fearless_bans: HashSet<String>,
    pub created_at: DateTime<Utc>,
}

impl DraftState {
    pub fn new(
        room_id: Uuid,
        lobby_id: Uuid,
        series_id: Option<Uuid>,
        draft_mode: DraftMode,
        blue_captain: Uuid,
        red_captain: Uuid,
        per_turn_timer_secs: u32,
        fearless_bans: HashSet<String>,
    ) -> Self {
        Self {
            room_id,
            lobby_id,
            series_id,
            draft_mode,
            status: RoomStatus::Waiting,
            blue_captain,
            red_captain,
            blue_ready: false,
            red_ready: false,
            script: standard_script(),
            phase_index: 0,
            blue_bans: Vec::new(),
            red_bans: Vec::new(),
            blue_picks: Vec::new(),
            red_picks: Vec::new(),
            pending_selection: None,
            hovered_champion: None,
            per_turn_timer_secs,
            timer_remaining_ms: (per_turn_timer_secs as i64) * 1000,
            buffering: false,
            buffer_remaining_secs: 0,
            paused_frozen_ms: None,
            resume_ready_blue: false,
            resume_ready_red: false,
            resume_countdown_remaining: None,
            pending_edit: None,
            fearless_bans,
            created_at: Utc::now(),
        }
    }

    pub fn current_phase(&self) -> Option<DraftPhase> {
        self.script.get(self.phase_index).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.phase_index >= TOTAL_PHASES
    }

    pub fn captain_for(&self, team: Team) -> Uuid {
        match team {
            Team::Blue => self.blue_captain,
            Team::Red => self.red_captain,
        }
    }

    pub fn side_of(&self, user_id: Uuid) -> Option<Team> {
        if user_id == self.blue_captain {
            Some(Team::Blue)
        } else if user_id == self.red_captain {
            Some(Team::Red)
        } else {
            None
        }
    }

    pub fn require_current_turn(&self, user_id: Uuid) -> Result<Team> {
        let phase = self.current_phase().ok_or(DraftCoreError::InvalidRoomState(
            "draft already complete".into(),
        ))?;
        if self.captain_for(phase.team) != user_id {
            return Err(DraftCoreError::NotYourTurn);
        }
        Ok(phase.team)
    }

    pub fn used_champions(&self) -> HashSet<&str> {
        self.blue_bans
            .iter()
            .chain(&self.red_bans)
            .chain(&self.blue_picks)
            .chain(&self.red_picks)
            .map(String::as_str)
            .collect()
    }

    pub fn is_champion_available(&self, champion_id: &str) -> bool {
        !self.used_champions().contains(champion_id) && !self.fearless_bans.contains(champion_id)
    }

    /// `select_champion` validates availability and stores the
    /// pending selection for the current phase.
    pub fn select_champion(&mut self, user_id: Uuid, champion_id: String) -> Result<()> {
        self.require_current_turn(user_id)?;
        if !self.is_champion_available(&champion_id) {
            return Err(DraftCoreError::ChampionUnavailable(champion_id));
        }
        self.pending_selection = Some(champion_id);
        Ok(())
    }

    pub fn hover(&mut self, user_id: Uuid, champion_id: Option<String>) -> Result<()> {
        self.require_current_turn(user_id)?;
        self.hovered_champion = champion_id;
        Ok(())
    }

    /// `lock_in` appends the pending selection to the right list,
    /// writes the action log row, advances the phase, and resets the timer
    /// to the full per-turn duration (a new phase always starts full).
    pub fn lock_in(&mut self, user_id: Uuid) -> Result<super::action::DraftAction> {
        let phase = self.require_current_turn(user_id)?;
        let champion_id = self
            .pending_selection
            .take()
            .ok_or(DraftCoreError::NoPendingSelection)?;

        let kind = self.current_phase().unwrap().kind;
        match (phase, kind) {
            (Team::Blue, PhaseKind::Ban) => self.blue_bans.push(champion_id.clone()),
            (Team::Red, PhaseKind::Ban) => self.red_bans.push(champion_id.clone()),
            (Team::Blue, PhaseKind::Pick) => self.blue_picks.push(champion_id.clone()),
            (Team::Red, PhaseKind::Pick) => self.red_picks.push(champion_id.clone()),
        }

        let action = super::action::DraftAction::new(
            self.room_id,
            self.phase_index as u8,
            phase,
            kind,
            champion_id,
        );

        self.hovered_champion = None;
        self.buffering = false;
        self.buffer_remaining_secs = 0;
        self.phase_index += 1;

        if self.is_complete() {
            self.status = RoomStatus::Completed;
            self.timer_remaining_ms = 0;
        } else {
            self.timer_remaining_ms = (self.per_turn_timer_secs as i64) * 1000;
        }

        Ok(action)
    }

    /// Autoselection fallback: the hovered champion if still
    /// available, else the first unused champion in the catalog's lexical
    /// order.
    pub fn autoselect_champion(&self, catalog_ids_lexical: &[String]) -> Option<String> {
        if let Some(hovered) = &self.hovered_champion {
            if self.is_champion_available(hovered) {
                return Some(hovered.clone());
            }
        }
        catalog_ids_lexical
            .iter()
            .find(|id| self.is_champion_available(id))
            .cloned()
    }

    pub fn pause(&mut self, user_id: Uuid) -> Result<i64> {
        if self.side_of(user_id).is_none() {
            return Err(DraftCoreError::NotCaptain);
        }
        if self.status != RoomStatus::InProgress {
            return Err(DraftCoreError::InvalidRoomState(
                "draft is not in progress".into(),
            ));
        }
        self.status = RoomStatus::Paused;
        self.paused_frozen_ms = Some(self.timer_remaining_ms);
        self.buffering = false;
        Ok(self.timer_remaining_ms)
    }

    pub fn set_resume_ready(&mut self, user_id: Uuid, ready: bool) -> Result<()> {
        let side = self.side_of(user_id).ok_or(DraftCoreError::NotCaptain)?;
        if self.status != RoomStatus::Paused {
            return Err(DraftCoreError::NotPaused);
        }
        match side {
            Team::Blue => self.blue_ready_to_resume(ready),
            Team::Red => self.red_ready_to_resume(ready),
        }
        if !self.blue_resume_ready() || !self.red_resume_ready() {
            self.resume_countdown_remaining = None;
        } else if self.resume_countdown_remaining.is_none() {
            self.resume_countdown_remaining = Some(super::types::RESUME_COUNTDOWN_SECS);
        }
        Ok(())
    }

    fn blue_ready_to_resume(&mut self, ready: bool) {
        self.resume_ready_blue = ready;
    }
    fn red_ready_to_resume(&mut self, ready: bool) {
        self.resume_ready_red = ready;
    }
    fn blue_resume_ready(&self) -> bool {
        self.resume_ready_blue
    }
    fn red_resume_ready(&self) -> bool {
        self.resume_ready_red
    }

    pub fn resume(&mut self) {
        self.status = RoomStatus::InProgress;
        self.timer_remaining_ms = self.paused_frozen_ms.take().unwrap_or(0);
        self.resume_ready_blue = false;
        self.resume_ready_red = false;
        self.resume_countdown_remaining = None;
    }

    pub fn propose_edit(
        &mut self,
        user_id: Uuid,
        slot_type: PhaseKind,
        team: Team,
        slot_index: usize,
        champion_id: String,
    ) -> Result<()> {
        let side = self.side_of(user_id).ok_or(DraftCoreError::NotCaptain)?;
        if self.status != RoomStatus::Paused {
            return Err(DraftCoreError::NotPaused);
        }
        if self.pending_edit.is_some() {
            return Err(DraftCoreError::InvalidRoomState(
                "an edit is already pending".into(),
            ));
        }
        let now = Utc::now();
        self.pending_edit = Some(PendingEdit {
            proposer_side: side,
            slot_type,
            team,
            slot_index,
            champion_id,
            created_at: now,
            expires_at: now + chrono::Duration::seconds(EDIT_EXPIRY_SECS),
        });
        Ok(())
    }

    fn slot_list_mut(&mut self, slot_type: PhaseKind, team: Team) -> &mut Vec<String> {
        match (slot_type, team) {
            (PhaseKind::Ban, Team::Blue) => &mut self.blue_bans,
            (PhaseKind::Ban, Team::Red) => &mut self.red_bans,
            (PhaseKind::Pick, Team::Blue) => &mut self.blue_picks,
            (PhaseKind::Pick, Team::Red) => &mut self.red_picks,
        }
    }

    /// Returns `Some(true)` for accept, `Some(false)` for reject/expiry, or
    /// `Err` if there is no pending edit or the responder isn't eligible.
    pub fn respond_edit(&mut self, user_id: Uuid, accept: bool) -> Result<bool> {
        let side = self.side_of(user_id).ok_or(DraftCoreError::NotCaptain)?;
        let edit = self
            .pending_edit
            .take()
            .ok_or(DraftCoreError::InvalidState("no pending edit".into()))?;

        if edit.is_expired_at(Utc::now()) {
            return Ok(false);
        }
        if side == edit.proposer_side {
            self.pending_edit = Some(edit);
            return Err(DraftCoreError::Unauthorized);
        }
        if !accept {
            return Ok(false);
        }

        let slot_type = edit.slot_type;
        let team = edit.team;
        let slot_index = edit.slot_index;
        let champion_id = edit.champion_id;
        let list = self.slot_list_mut(slot_type, team);
        if let Some(slot) = list.get_mut(slot_index) {
            *slot = champion_id;
        } else {
            return Err(DraftCoreError::InvalidInput("edit slot out of range".into()));
        }
        Ok(true)
    }

    pub fn expire_pending_edit_if_due(&mut self) -> bool {
        if let Some(edit) = &self.pending_edit {
            if edit.is_expired_at(Utc::now()) {
                self.pending_edit = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> DraftState {
        DraftState::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            DraftMode::Standard,
            Uuid::new_v4(),
            Uuid::new_v4(),
            30,
            HashSet::new(),
        )
    }

    #[test]
    fn first_phase_is_blue_ban() {
        let state = sample_state();
        let phase = state.current_phase().unwrap();
        assert_eq!(phase.team, Team::Blue);
        assert_eq!(phase.kind, PhaseKind::Ban);
    }

    #[test]
    fn lock_in_requires_pending_selection() {
        let mut state = sample_state();
        let blue = state.blue_captain;
        let err = state.lock_in(blue).unwrap_err();
        assert!(matches!(err, DraftCoreError::NoPendingSelection));
    }

    #[test]
    fn lock_in_advances_phase_and_resets_timer() {
        let mut state = sample_state();
        let blue = state.blue_captain;
        state.timer_remaining_ms = 5000;
        state.select_champion(blue, "ahri".into()).unwrap();
        state.lock_in(blue).unwrap();
        assert_eq!(state.phase_index, 1);
        assert_eq!(state.timer_remaining_ms, 30_000);
        assert_eq!(state.blue_bans, vec!["ahri".to_string()]);
    }

    #[test]
    fn used_champion_is_unavailable() {
        let mut state = sample_state();
        let blue = state.blue_captain;
        state.select_champion(blue, "ahri".into()).unwrap();
        state.lock_in(blue).unwrap();
        let red = state.red_captain;
        let err = state.select_champion(red, "ahri".into()).unwrap_err();
        assert!(matches!(err, DraftCoreError::ChampionUnavailable(_)));
    }

    #[test]
    fn wrong_side_cannot_select() {
        let mut state = sample_state();
        let red = state.red_captain;
        let err = state.select_champion(red, "ahri".into()).unwrap_err();
        assert!(matches!(err, DraftCoreError::NotYourTurn));
    }

    #[test]
    fn fearless_bans_are_unavailable() {
        let mut bans = HashSet::new();
        bans.insert("ahri".to_string());
        let mut state = DraftState::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
            DraftMode::Fearless,
            Uuid::new_v4(),
            Uuid::new_v4(),
            30,
            bans,
        );
        let blue = state.blue_captain;
        let err = state.select_champion(blue, "ahri".into()).unwrap_err();
        assert!(matches!(err, DraftCoreError::ChampionUnavailable(_)));
    }

    #[test]
    fn pause_freezes_and_resume_restores_timer() {
        let mut state = sample_state();
        state.status = RoomStatus::InProgress;
        state.timer_remaining_ms = 12_000;
        let blue = state.blue_captain;
        let frozen = state.pause(blue).unwrap();
        assert_eq!(frozen, 12_000);
        assert_eq!(state.status, RoomStatus::Paused);

        state.set_resume_ready(blue, true).unwrap();
        let red = state.red_captain;
        state.set_resume_ready(red, true).unwrap();
        assert_eq!(state.resume_countdown_remaining, Some(RESUME_COUNTDOWN_SECS_FOR_TEST));

        state.resume();
        assert_eq!(state.status, RoomStatus::InProgress);
        assert_eq!(state.timer_remaining_ms, 12_000);
    }

    const RESUME_COUNTDOWN_SECS_FOR_TEST: u8 = super::super::types::RESUME_COUNTDOWN_SECS;

    #[test]
    fn unsetting_resume_ready_cancels_countdown() {
        let mut state = sample_state();
        state.status = RoomStatus::InProgress;
        let blue = state.blue_captain;
        let red = state.red_captain;
        state.pause(blue).unwrap();
        state.set_resume_ready(blue, true).unwrap();
        state.set_resume_ready(red, true).unwrap();
        assert!(state.resume_countdown_remaining.is_some());
        state.set_resume_ready(blue, false).unwrap();
        assert!(state.resume_countdown_remaining.is_none());
    }
}
