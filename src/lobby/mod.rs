//! Lobby coordinator: membership, captaincy, the
//! two-captain consensus protocol, and voting.

mod coordinator;
mod lobby;
mod pending_action;
mod player;
mod store;
mod types;
mod vote;

pub use coordinator::{LobbyCoordinator, RoomSeed, RoomSpawner};
pub use lobby::{generate_short_code, Lobby, MAX_PLAYERS, SHORT_CODE_LEN};
pub use pending_action::{ActionKind, ActionStatus, PendingAction};
pub use player::LobbyPlayer;
pub use store::{InMemoryLobbyRepository, LobbyRepository, SharedLobbyRepository};
pub use types::{
    validate_turn_timer, DraftMode, LobbyStatus, VotingConfig, VotingMode, DEFAULT_TURN_TIMER_SECS,
    EDIT_EXPIRY_SECS, MAX_TURN_TIMER_SECS, MIN_TURN_TIMER_SECS, PROPOSAL_EXPIRY_SECS,
    RESUME_COUNTDOWN_SECS,
};
pub use vote::{VoteBoard, VoteTally};
