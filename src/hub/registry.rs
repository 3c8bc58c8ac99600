use super::client::{ClientEntry, ClientId, OUTBOUND_BUFFER};
use super::protocol::{server_frame_json, ClientCommand};
use crate::auth::TokenValidator;
use crate::catalog::ChampionCatalog;
use crate::draft::{DraftState, RoomActor, RoomHandle};
use crate::error::{DraftCoreError, Result};
use crate::lobby::coordinator::{RoomSeed, RoomSpawner};
use crate::persistence::draft_store::SharedDraftRepository;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};
use uuid::Uuid;

/// Process-wide registry of active rooms and clients. Authenticates
/// connections, routes inbound commands to the owning draft room actor, and
/// fans out that actor's outbound events to every subscriber of its room.
/// Also implements [`RoomSpawner`] so the lobby coordinator can hand it a
/// [`RoomSeed`] and get back a registered, running room with no separate
/// wiring step.
///
/// Grounded on the teacher's connection-manager pattern (an id -> sender
/// map behind a lock), generalized from one flat map to two: rooms (by
/// room id) and clients (by client id), with a forwarding task per
/// room-join bridging the room's broadcast channel to the client's bounded
/// mpsc buffer.
pub struct ConnectionHub {
    validator: Arc<dyn TokenValidator>,
    catalog: Arc<dyn ChampionCatalog>,
    draft_repo: SharedDraftRepository,
    rooms: Arc<RwLock<HashMap<Uuid, RoomHandle>>>,
    clients: Arc<RwLock<HashMap<ClientId, ClientEntry>>>,
    next_client_id: AtomicU64,
}

impl ConnectionHub {
    pub fn new(
        validator: Arc<dyn TokenValidator>,
        catalog: Arc<dyn ChampionCatalog>,
        draft_repo: SharedDraftRepository,
    ) -> Self {
        Self {
            validator,
            catalog,
            draft_repo,
            rooms: Arc::new(RwLock::new(HashMap::new())),
            clients: Arc::new(RwLock::new(HashMap::new())),
            next_client_id: AtomicU64::new(1),
        }
    }

    /// Upgrades a connection: validates the bearer token and registers a
    /// bounded send buffer for it. Returns the client id (used to route
    /// subsequent `dispatch` calls) and the receiving half of its outbound
    /// buffer, which the socket layer (out of scope here) drains and
    /// writes to the wire.
    pub async fn connect(&self, token: &str) -> Result<(ClientId, mpsc::Receiver<String>)> {
        let user_id = self.validator.validate(token).await?;
        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        let client_id = self.next_client_id.fetch_add(1, Ordering::SeqCst);
        self.clients.write().await.insert(
            client_id,
            ClientEntry {
                user_id,
                sender: tx,
                subscribed_room: None,
            },
        );
        tracing::info!(client_id, %user_id, "client connected");
        Ok((client_id, rx))
    }

    /// Removes a client from the registry, dropping it out of whatever
    /// room's subscriber set it was in. The room itself is untouched: its
    /// state is pure server-side, so a later reconnect just `join_room`s
    /// again and receives a fresh `STATE_SYNC`.
    pub async fn disconnect(&self, client_id: ClientId) {
        if let Some(entry) = self.clients.write().await.remove(&client_id) {
            tracing::info!(client_id, user_id = %entry.user_id, "client disconnected");
        }
    }

    async fn room_handle(&self, room_id: Uuid) -> Result<RoomHandle> {
        self.rooms
            .read()
            .await
            .get(&room_id)
            .cloned()
            .ok_or(DraftCoreError::RoomNotFound(room_id))
    }

    /// `join_room` dispatches to the owning actor for a full
    /// state snapshot, wires the client into that room's subscriber set,
    /// and spawns the forwarding task that bridges the actor's broadcast
    /// channel to this client's bounded send buffer.
    pub async fn join_room(&self, client_id: ClientId, room_id: Uuid) -> Result<DraftState> {
        let user_id = {
            let clients = self.clients.read().await;
            clients
                .get(&client_id)
                .map(|c| c.user_id)
                .ok_or(DraftCoreError::Unauthorized)?
        };
        let handle = self.room_handle(room_id).await?;
        let snapshot = handle.join_room(user_id).await?;

        let sender = {
            let mut clients = self.clients.write().await;
            let entry = clients.get_mut(&client_id).ok_or(DraftCoreError::Unauthorized)?;
            entry.subscribed_room = Some(room_id);
            entry.sender.clone()
        };

        let mut events = handle.subscribe();
        let clients = self.clients.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let frame = server_frame_json(&event);
                        if sender.try_send(frame).is_err() {
                            // Bounded buffer full or the client's receiver
                            // was dropped: drop-and-disconnect.
                            clients.write().await.remove(&client_id);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(snapshot)
    }

    /// Routes one parsed inbound command to the client's currently-joined
    /// room actor. `join_room` itself is handled separately (it needs the
    /// target room id, which `dispatch`'s uniform signature doesn't carry).
    pub async fn dispatch(&self, client_id: ClientId, command: ClientCommand) -> Result<()> {
        let (user_id, room_id) = {
            let clients = self.clients.read().await;
            let entry = clients.get(&client_id).ok_or(DraftCoreError::Unauthorized)?;
            (entry.user_id, entry.subscribed_room)
        };
        let room_id = room_id.ok_or_else(|| {
            DraftCoreError::InvalidRoomState("client has not joined a room".into())
        })?;
        let handle = self.room_handle(room_id).await?;

        match command {
            ClientCommand::JoinRoom => Err(DraftCoreError::InvalidInput(
                "join_room must be sent through ConnectionHub::join_room".into(),
            )),
            ClientCommand::SetReady { ready } => handle.set_ready(user_id, ready).await,
            ClientCommand::StartDraft => handle.start_draft(user_id).await,
            ClientCommand::HoverChampion { champion_id } => {
                handle.hover_champion(user_id, champion_id).await
            }
            ClientCommand::SelectChampion { champion_id } => {
                handle.select_champion(user_id, champion_id).await
            }
            ClientCommand::LockIn => handle.lock_in(user_id).await,
            ClientCommand::PauseDraft => handle.pause_draft(user_id).await,
            ClientCommand::ResumeReady { ready } => handle.resume_ready(user_id, ready).await,
            ClientCommand::ProposeEdit {
                slot_type,
                team,
                slot_index,
                champion_id,
            } => {
                handle
                    .propose_edit(user_id, slot_type, team, slot_index, champion_id)
                    .await
            }
            ClientCommand::RespondEdit { accept } => handle.respond_edit(user_id, accept).await,
        }
    }

    /// Room ids, among those registered with this hub, where it is
    /// currently `user_id`'s turn to act. Backs the per-user aggregation
    /// query.
    pub async fn rooms_awaiting_turn(&self, user_id: Uuid) -> Vec<Uuid> {
        let rooms: Vec<(Uuid, RoomHandle)> = self
            .rooms
            .read()
            .await
            .iter()
            .map(|(id, h)| (*id, h.clone()))
            .collect();

        let mut awaiting = Vec::new();
        for (room_id, handle) in rooms {
            if let Ok(state) = handle.snapshot().await {
                if state.status == crate::draft::RoomStatus::InProgress {
                    if let Some(phase) = state.current_phase() {
                        if state.captain_for(phase.team) == user_id {
                            awaiting.push(room_id);
                        }
                    }
                }
            }
        }
        awaiting
    }
}

#[async_trait::async_trait]
impl RoomSpawner for ConnectionHub {
    /// `start_draft` materializes a fresh [`DraftState`]
    /// from the lobby's seed, folding in the series' accumulated fearless
    /// bans when the lobby links to one, then spawns and registers the
    /// actor.
    async fn spawn_room(&self, seed: RoomSeed) -> Result<Uuid> {
        let fearless_bans = match seed.series_id {
            Some(series_id) => self
                .draft_repo
                .load_series(series_id)
                .await
                .map(|s| s.fearless_bans)
                .unwrap_or_default(),
            None => Default::default(),
        };

        let room_id = Uuid::new_v4();
        let state = DraftState::new(
            room_id,
            seed.lobby_id,
            seed.series_id,
            seed.draft_mode,
            seed.blue_captain,
            seed.red_captain,
            seed.per_turn_timer_secs,
            fearless_bans,
        );
        let handle = RoomActor::spawn(state, self.catalog.clone(), self.draft_repo.clone());
        self.rooms.write().await.insert(room_id, handle);
        tracing::info!(%room_id, lobby_id = %seed.lobby_id, "room spawned");
        Ok(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenValidator;
    use crate::catalog::InMemoryChampionCatalog;
    use crate::lobby::DraftMode;
    use crate::persistence::draft_store::InMemoryDraftRepository;
    use std::collections::HashMap as StdHashMap;

    fn hub() -> (ConnectionHub, Uuid, String) {
        let user_id = Uuid::new_v4();
        let token = "tok-123".to_string();
        let mut tokens = StdHashMap::new();
        tokens.insert(token.clone(), user_id);
        let hub = ConnectionHub::new(
            Arc::new(StaticTokenValidator::new(tokens)),
            Arc::new(InMemoryChampionCatalog::new(vec!["ahri".into(), "zed".into()])),
            Arc::new(InMemoryDraftRepository::new()),
        );
        (hub, user_id, token)
    }

    #[tokio::test]
    async fn connect_rejects_unknown_token() {
        let (hub, _, _) = hub();
        assert!(hub.connect("bogus").await.is_err());
    }

    #[tokio::test]
    async fn connect_then_join_room_delivers_snapshot() {
        let (hub, blue, token) = hub();
        let red = Uuid::new_v4();

        let room_id = hub
            .spawn_room(RoomSeed {
                lobby_id: Uuid::new_v4(),
                series_id: None,
                draft_mode: DraftMode::Standard,
                per_turn_timer_secs: 30,
                blue_captain: blue,
                red_captain: red,
                rosters: Vec::new(),
            })
            .await
            .unwrap();

        let (client_id, _rx) = hub.connect(&token).await.unwrap();
        let snapshot = hub.join_room(client_id, room_id).await.unwrap();
        assert_eq!(snapshot.room_id, room_id);
    }

    #[tokio::test]
    async fn dispatch_without_joining_a_room_errors() {
        let (hub, _blue, token) = hub();
        let (client_id, _rx) = hub.connect(&token).await.unwrap();
        let err = hub
            .dispatch(client_id, ClientCommand::LockIn)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftCoreError::InvalidRoomState(_)));
    }

    #[tokio::test]
    async fn fanout_reaches_joined_client() {
        let (hub, blue, token) = hub();
        let red = Uuid::new_v4();
        let room_id = hub
            .spawn_room(RoomSeed {
                lobby_id: Uuid::new_v4(),
                series_id: None,
                draft_mode: DraftMode::Standard,
                per_turn_timer_secs: 30,
                blue_captain: blue,
                red_captain: red,
                rosters: Vec::new(),
            })
            .await
            .unwrap();

        let (client_id, mut rx) = hub.connect(&token).await.unwrap();
        hub.join_room(client_id, room_id).await.unwrap();

        hub.dispatch(client_id, ClientCommand::SetReady { ready: true })
            .await
            .unwrap();

        let frame = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(frame.contains("PLAYER_UPDATE"));
    }
}
