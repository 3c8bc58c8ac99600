//! Per-client bookkeeping: the authenticated user id, the room (if any) the
//! client has joined, and a bounded outbound send buffer.

use tokio::sync::mpsc;
use uuid::Uuid;

/// Opaque id for one connected socket. Assigned by [`super::ConnectionHub`]
/// on connect; distinct from `user_id` since one user may hold multiple
/// connections (e.g. a reconnect grace window overlapping the old socket).
pub type ClientId = u64;

/// Bounded outbound queue depth per client, backing the drop-and-disconnect
/// policy on overflow. Sized generously since STATE_SYNC payloads are the
/// largest frame and only sent once per join/reconnect.
pub const OUTBOUND_BUFFER: usize = 128;

pub(super) struct ClientEntry {
    pub user_id: Uuid,
    pub sender: mpsc::Sender<String>,
    pub subscribed_room: Option<Uuid>,
}
