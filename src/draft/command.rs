use super::state::DraftState;
use super::types::PhaseKind;
use crate::error::Result;
use crate::matchmaking::Team;
use tokio::sync::oneshot;
use uuid::Uuid;

pub type Reply<T> = oneshot::Sender<Result<T>>;

/// Commands accepted by the draft room actor's inbox. Each carries a
/// `Reply` so the caller gets a response without a second round trip
/// through the hub.
pub enum RoomCommand {
    JoinRoom { user_id: Uuid, reply: Reply<DraftState> },
    SetReady { user_id: Uuid, ready: bool, reply: Reply<()> },
    StartDraft { user_id: Uuid, reply: Reply<()> },
    HoverChampion { user_id: Uuid, champion_id: Option<String>, reply: Reply<()> },
    SelectChampion { user_id: Uuid, champion_id: String, reply: Reply<()> },
    LockIn { user_id: Uuid, reply: Reply<()> },
    PauseDraft { user_id: Uuid, reply: Reply<()> },
    ResumeReady { user_id: Uuid, ready: bool, reply: Reply<()> },
    ProposeEdit {
        user_id: Uuid,
        slot_type: PhaseKind,
        team: Team,
        slot_index: usize,
        champion_id: String,
        reply: Reply<()>,
    },
    RespondEdit { user_id: Uuid, accept: bool, reply: Reply<()> },
    Snapshot { reply: Reply<DraftState> },
}
