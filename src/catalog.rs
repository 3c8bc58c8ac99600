//! Champion catalog: a narrow external collaborator the
//! draft room depends only on this trait to decide availability and to
//! pick an autoselection fallback.

use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChampionCatalog: Send + Sync {
    /// All playable champion ids, in the catalog's canonical lexical order.
    /// Autoselection's deterministic fallback walks this list, choosing the
    /// first unused champion in lexical order.
    async fn all_champion_ids(&self) -> Vec<String>;
}

/// Fixed in-memory catalog, used for tests and as a default when no
/// external champion service is wired in.
pub struct InMemoryChampionCatalog {
    ids: Vec<String>,
}

impl InMemoryChampionCatalog {
    pub fn new(mut ids: Vec<String>) -> Self {
        ids.sort();
        Self { ids }
    }
}

#[async_trait]
impl ChampionCatalog for InMemoryChampionCatalog {
    async fn all_champion_ids(&self) -> Vec<String> {
        self.ids.clone()
    }
}
