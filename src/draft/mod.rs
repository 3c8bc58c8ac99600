//! Draft room actor: one single-writer actor per room,
//! the fixed 20-phase ban/pick script, timers, pause/resume, and the
//! paused-state edit protocol.

mod action;
mod actor;
mod command;
mod event;
mod phase_script;
mod series;
mod state;
mod types;

pub use action::DraftAction;
pub use actor::{RoomActor, RoomHandle};
pub use command::RoomCommand;
pub use event::RoomEvent;
pub use phase_script::standard_script;
pub use series::Series;
pub use state::{DraftState, PendingEdit};
pub use types::{
    DraftPhase, PhaseKind, RoomStatus, BUFFER_SECS, EDIT_EXPIRY_SECS, RESUME_COUNTDOWN_SECS,
    TICK_INTERVAL_MS, TOTAL_PHASES,
};
