//! Persistence boundary: trait-only for lobby/draft state,
//! each with an in-memory default implementation. No real SQL/Redis backend
//! ships with this crate; see DESIGN.md for the rationale.

pub mod draft_store;

pub use draft_store::{DraftRepository, InMemoryDraftRepository, SharedDraftRepository};
