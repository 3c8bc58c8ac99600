use thiserror::Error;
use uuid::Uuid;

/// Crate-wide error type. Each variant corresponds to one error *kind* from
/// the component specs; REST transports (out of scope here) map these to
/// status codes as noted per variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftCoreError {
    // -- matchmaking --
    /// 400 — the matchmaking engine requires exactly ten ready players.
    #[error("matchmaking requires exactly ten players, got {0}")]
    NotEnoughPlayers(usize),

    // -- lobby / coordinator --
    /// 404
    #[error("lobby not found: {0}")]
    LobbyNotFound(Uuid),
    /// 409 — operation is not legal in the lobby's current status.
    #[error("invalid lobby state for this operation: {0}")]
    InvalidState(String),
    /// 409 — lobby already has ten players.
    #[error("lobby is full")]
    Full,
    /// 403 — caller is not a member of this lobby.
    #[error("player is not in this lobby")]
    NotInLobby,
    /// 403 — caller is not the captain of the relevant team.
    #[error("player is not a captain")]
    NotCaptain,
    /// 409 — a pending proposal already exists for this lobby.
    #[error("a pending action already exists for this lobby")]
    PendingActionExists,
    /// 410 — the pending action's expiry has passed.
    #[error("pending action has expired")]
    ActionExpired,
    /// 400 — generate_teams requires all ten players ready.
    #[error("not all players are ready")]
    PlayersNotReady,
    /// 400 — select_option referenced an option number that does not exist.
    #[error("invalid match option: {0}")]
    InvalidMatchOption(i32),
    /// 400 — captain attempted to kick themselves.
    #[error("captain cannot kick themselves")]
    CannotKickSelf,
    /// 409 — voting operation attempted on a lobby without voting enabled.
    #[error("voting is not enabled for this lobby")]
    VotingNotEnabled,
    /// 409 — vote/end-voting attempted after the voting round closed.
    #[error("voting round is closed")]
    VotingRoundClosed,

    // -- draft room --
    /// 404
    #[error("room not found: {0}")]
    RoomNotFound(Uuid),
    /// 409 — command not legal in the room's current phase/status.
    #[error("invalid room state for this operation: {0}")]
    InvalidRoomState(String),
    /// 403 — command requires the current-turn captain, someone else sent it.
    #[error("not this side's turn")]
    NotYourTurn,
    /// 400 — champion id already used (picked/banned) or fearless-banned.
    #[error("champion is unavailable: {0}")]
    ChampionUnavailable(String),
    /// 400 — lock_in with no pending selection.
    #[error("no pending selection to lock in")]
    NoPendingSelection,
    /// 409 — pause/resume/edit command issued against an unexpected pause state.
    #[error("draft is not in the expected pause state")]
    NotPaused,
    /// 410 — edit proposal expired before the opposing captain responded.
    #[error("edit proposal has expired")]
    EditExpired,

    // -- hub / auth (narrow external collaborators) --
    /// 401
    #[error("invalid or expired token")]
    Unauthorized,

    // -- persistence (external collaborator via repository interfaces) --
    /// 500 — caller should retry; mutations are designed to be re-runnable.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// 400 — malformed input that doesn't fit a more specific kind above.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, DraftCoreError>;
