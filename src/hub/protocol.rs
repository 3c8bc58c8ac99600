//! Wire protocol: frames are JSON records `{type, payload, timestamp}`.
//! Client-originated frames use the single type `COMMAND` with payload
//! `{action, payload?}`; server-originated frames use the event type names
//! of `RoomEvent`.

use crate::draft::{PhaseKind, RoomEvent};
use crate::matchmaking::Team;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One of the ten actions a client may send. Modeled as an
/// adjacently-tagged enum so the wire shape is exactly `{action, payload}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum ClientCommand {
    JoinRoom,
    SetReady { ready: bool },
    StartDraft,
    HoverChampion { champion_id: Option<String> },
    SelectChampion { champion_id: String },
    LockIn,
    PauseDraft,
    ResumeReady { ready: bool },
    ProposeEdit {
        slot_type: PhaseKind,
        team: Team,
        slot_index: usize,
        champion_id: String,
    },
    RespondEdit { accept: bool },
}

/// The client's outer envelope. `frame_type` is always `"COMMAND"`; the
/// command itself is nested under `payload`, matching the
/// `{action, payload?}` shape within the outer `{type, payload, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientFrame {
    #[serde(rename = "type")]
    pub frame_type: String,
    pub payload: ClientCommand,
    #[serde(default = "Utc::now")]
    pub timestamp: chrono::DateTime<Utc>,
}

/// Parses one inbound text frame. Malformed JSON or an unrecognized action
/// surfaces as `InvalidInput`, which the caller turns into a non-fatal
/// `ERROR` event rather than closing the connection.
pub fn parse_client_frame(raw: &str) -> crate::error::Result<ClientCommand> {
    serde_json::from_str::<ClientFrame>(raw)
        .map(|f| f.payload)
        .map_err(|e| crate::error::DraftCoreError::InvalidInput(format!("malformed frame: {e}")))
}

/// The event-type name used on the wire for each [`RoomEvent`] variant.
fn event_type_name(event: &RoomEvent) -> &'static str {
    match event {
        RoomEvent::StateSync(_) => "STATE_SYNC",
        RoomEvent::PlayerUpdate { .. } => "PLAYER_UPDATE",
        RoomEvent::DraftStarted => "DRAFT_STARTED",
        RoomEvent::PhaseChanged { .. } => "PHASE_CHANGED",
        RoomEvent::ChampionSelected { .. } => "CHAMPION_SELECTED",
        RoomEvent::ChampionHovered { .. } => "CHAMPION_HOVERED",
        RoomEvent::TimerTick { .. } => "TIMER_TICK",
        RoomEvent::DraftPaused { .. } => "DRAFT_PAUSED",
        RoomEvent::DraftResumed { .. } => "DRAFT_RESUMED",
        RoomEvent::ResumeReadyUpdate { .. } => "RESUME_READY_UPDATE",
        RoomEvent::ResumeCountdown { .. } => "RESUME_COUNTDOWN",
        RoomEvent::EditProposed { .. } => "EDIT_PROPOSED",
        RoomEvent::EditApplied { .. } => "EDIT_APPLIED",
        RoomEvent::EditRejected => "EDIT_REJECTED",
        RoomEvent::DraftCompleted => "DRAFT_COMPLETED",
        RoomEvent::Error { .. } => "ERROR",
    }
}

/// Serializes a [`RoomEvent`] into the `{type, payload, timestamp}` wire
/// frame as a JSON string, ready to hand to a client's send buffer.
pub fn server_frame_json(event: &RoomEvent) -> String {
    let frame = serde_json::json!({
        "type": event_type_name(event),
        "payload": event,
        "timestamp": Utc::now(),
    });
    // Construction above is infallible: RoomEvent derives Serialize over
    // plain data (no maps with non-string keys, no floats that are NaN).
    frame.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_ready_command() {
        let raw = r#"{"type":"COMMAND","payload":{"action":"set_ready","payload":{"ready":true}},"timestamp":"2024-01-01T00:00:00Z"}"#;
        let command = parse_client_frame(raw).unwrap();
        assert!(matches!(command, ClientCommand::SetReady { ready: true }));
    }

    #[test]
    fn parses_unit_variant_without_payload() {
        let raw = r#"{"type":"COMMAND","payload":{"action":"lock_in"},"timestamp":"2024-01-01T00:00:00Z"}"#;
        let command = parse_client_frame(raw).unwrap();
        assert!(matches!(command, ClientCommand::LockIn));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_client_frame("not json").is_err());
    }

    #[test]
    fn server_frame_carries_event_type_name() {
        let json = server_frame_json(&RoomEvent::DraftCompleted);
        assert!(json.contains("\"DRAFT_COMPLETED\""));
    }
}
