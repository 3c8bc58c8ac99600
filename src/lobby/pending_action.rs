use super::types::PROPOSAL_EXPIRY_SECS;
use crate::matchmaking::Team;
use crate::profile::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The mutation a captain is proposing. Each variant carries only the
/// fields relevant to it (tagged-variant dispatch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    SwapPlayers { a: Uuid, b: Uuid },
    SwapRoles { team: Team, a: Uuid, b: Uuid },
    Matchmake,
    SelectOption { option_number: i32 },
    StartDraft,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::SwapPlayers { .. } => "swap_players",
            ActionKind::SwapRoles { .. } => "swap_roles",
            ActionKind::Matchmake => "matchmake",
            ActionKind::SelectOption { .. } => "select_option",
            ActionKind::StartDraft => "start_draft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

/// A captain-proposed mutation awaiting the other captain's approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    pub id: Uuid,
    pub lobby_id: Uuid,
    pub action: ActionKind,
    pub proposer: Uuid,
    pub proposer_side: Team,
    pub approved_by_blue: bool,
    pub approved_by_red: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: ActionStatus,
}

impl PendingAction {
    pub fn propose(lobby_id: Uuid, action: ActionKind, proposer: Uuid, proposer_side: Team) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            lobby_id,
            action,
            proposer,
            proposer_side,
            approved_by_blue: proposer_side == Team::Blue,
            approved_by_red: proposer_side == Team::Red,
            created_at: now,
            expires_at: now + chrono::Duration::seconds(PROPOSAL_EXPIRY_SECS),
            status: ActionStatus::Pending,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn both_approved(&self) -> bool {
        self.approved_by_blue && self.approved_by_red
    }

    /// Records approval from the other captain's side; returns true once
    /// both sides have approved (ready to execute).
    pub fn approve(&mut self, side: Team) {
        match side {
            Team::Blue => self.approved_by_blue = true,
            Team::Red => self.approved_by_red = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposer_side_is_pre_approved() {
        let pa = PendingAction::propose(Uuid::new_v4(), ActionKind::StartDraft, Uuid::new_v4(), Team::Blue);
        assert!(pa.approved_by_blue);
        assert!(!pa.approved_by_red);
        assert!(!pa.both_approved());
    }

    #[test]
    fn approving_other_side_completes_it() {
        let mut pa = PendingAction::propose(Uuid::new_v4(), ActionKind::StartDraft, Uuid::new_v4(), Team::Blue);
        pa.approve(Team::Red);
        assert!(pa.both_approved());
    }

    #[test]
    fn expiry_is_five_minutes_out() {
        let pa = PendingAction::propose(Uuid::new_v4(), ActionKind::StartDraft, Uuid::new_v4(), Team::Blue);
        let delta = pa.expires_at - pa.created_at;
        assert_eq!(delta.num_seconds(), PROPOSAL_EXPIRY_SECS);
        assert!(!pa.is_expired_at(pa.created_at));
        assert!(pa.is_expired_at(pa.expires_at));
    }
}
