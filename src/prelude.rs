//! Prelude module with commonly used types and traits.
//!
//! ```rust
//! use draftcore::prelude::*;
//! ```

pub use crate::{
    auth::{StaticTokenValidator, TokenValidator},
    catalog::{ChampionCatalog, InMemoryChampionCatalog},
    config::{DraftCoreConfig, MatchmakingConfig, TimerConfig},
    draft::{
        DraftAction, DraftPhase, DraftState, PendingEdit, PhaseKind, RoomActor, RoomCommand,
        RoomEvent, RoomHandle, RoomStatus, Series,
    },
    error::{DraftCoreError, Result},
    hub::{ClientCommand, ClientId, ConnectionHub, PendingForUser},
    lobby::{
        ActionKind, ActionStatus, DraftMode, InMemoryLobbyRepository, Lobby, LobbyCoordinator,
        LobbyPlayer, LobbyRepository, LobbyStatus, PendingAction, RoomSeed, RoomSpawner,
        VoteBoard, VoteTally, VotingConfig, VotingMode,
    },
    matchmaking::{Assignment, MatchOption, MatchmakingBatch, MatchmakingEngine, PlayerProfiles, Team},
    persistence::draft_store::{DraftRepository, InMemoryDraftRepository, SharedDraftRepository},
    profile::{InMemoryProfileStore, ProfileStore, Role, RoleProfile, User},
};

// Re-export common external dependencies, matching the corpus's convention
// of making these available wherever the prelude is.
pub use async_trait::async_trait;
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use std::sync::Arc;
pub use tokio::sync::RwLock;
pub use uuid::Uuid;
