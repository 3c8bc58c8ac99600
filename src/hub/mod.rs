//! Connection hub: authenticates WebSocket clients, routes inbound commands
//! to the owning draft room actor, and fans out that actor's outbound
//! events to every subscriber of a room.

mod client;
mod pending;
mod protocol;
mod registry;

pub use client::{ClientId, OUTBOUND_BUFFER};
pub use pending::{pending_for_user, AwaitingApproval, PendingForUser};
pub use protocol::{parse_client_frame, server_frame_json, ClientCommand, ClientFrame};
pub use registry::ConnectionHub;
