//! draftcore
//!
//! Coordination core for a competitive draft server: ten players assemble
//! in a lobby, are algorithmically split into two balanced five-player
//! teams, and proceed through a scripted twenty-step ban/pick draft room
//! driven by authoritative server timers and captain actions.
//!
//! This crate owns three tightly coupled subsystems and the connective
//! tissue between them:
//!
//! - [`matchmaking`] — the comfort-first, progressive-rating-tolerance
//!   engine that generates balanced team/role assignments.
//! - [`lobby`] — the lobby lifecycle, membership, and the two-captain
//!   consensus protocol that gates every team-affecting mutation.
//! - [`draft`] — the per-room actor that runs the fixed 20-phase ban/pick
//!   script, its timers, pause/resume, and the paused-state edit protocol.
//! - [`hub`] — the WebSocket connection registry that routes commands into
//!   the right room actor and fans its events out to subscribers.
//!
//! HTTP routing, credential issuance, real persistence backends, and
//! champion catalog ingestion are narrow external collaborators: this
//! crate defines their trait boundaries ([`auth::TokenValidator`],
//! [`catalog::ChampionCatalog`], the `*Repository` traits) and ships only
//! in-memory implementations, for tests and for running the system
//! standalone.
//!
//! # Quick start
//!
//! ```rust
//! use draftcore::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<()> {
//! let lobby_repo: Arc<dyn LobbyRepository> = Arc::new(InMemoryLobbyRepository::new());
//! let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
//! let draft_repo: Arc<dyn DraftRepository> = Arc::new(InMemoryDraftRepository::new());
//! let catalog: Arc<dyn ChampionCatalog> =
//!     Arc::new(InMemoryChampionCatalog::new(vec!["ahri".into(), "zed".into()]));
//! let validator: Arc<dyn TokenValidator> =
//!     Arc::new(StaticTokenValidator::new(Default::default()));
//!
//! let hub = Arc::new(ConnectionHub::new(validator, catalog, draft_repo));
//! let coordinator = LobbyCoordinator::new(lobby_repo, profiles, hub);
//!
//! let creator = Uuid::new_v4();
//! let lobby = coordinator
//!     .create(creator, DraftMode::Standard, VotingConfig::default())
//!     .await?;
//! # let _ = lobby;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod draft;
pub mod error;
pub mod hub;
pub mod lobby;
pub mod matchmaking;
pub mod persistence;
pub mod profile;

pub use config::{DraftCoreConfig, MatchmakingConfig, TimerConfig};
pub use error::{DraftCoreError, Result};

pub mod prelude;

/// Crate version, handy to log alongside `tracing`'s other structured
/// fields at startup.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
