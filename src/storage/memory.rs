//! In-memory player store, for tests and throwaway runs.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{PlayerStore, StoreError, StoreResult};
use crate::models::{ExternalId, Player, PlayerId, WeekAnchor};

#[derive(Debug, Default)]
struct Tables {
    players: HashMap<PlayerId, Player>,
    by_external_id: HashMap<ExternalId, PlayerId>,
}

/// Players and the external-id index behind a single lock, so each write is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored players.
    pub async fn len(&self) -> usize {
        self.tables.read().await.players.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn get_by_external_id(&self, external_id: ExternalId) -> StoreResult<Option<Player>> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_external_id
            .get(&external_id)
            .and_then(|id| tables.players.get(id))
            .cloned())
    }

    async fn insert(&self, player: &Player) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(ext) = player.external_id {
            if tables.by_external_id.contains_key(&ext) {
                return Err(StoreError::DuplicateExternalId(ext));
            }
            tables.by_external_id.insert(ext, player.id);
        }
        tables.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn update(&self, player: &Player) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let old_ext = match tables.players.get(&player.id) {
            Some(old) => old.external_id,
            None => return Err(StoreError::MissingPlayer(player.id)),
        };
        if old_ext != player.external_id {
            if let Some(ext) = player.external_id {
                if tables.by_external_id.get(&ext).is_some_and(|id| *id != player.id) {
                    return Err(StoreError::DuplicateExternalId(ext));
                }
                tables.by_external_id.insert(ext, player.id);
            }
            if let Some(ext) = old_ext {
                tables.by_external_id.remove(&ext);
            }
        }
        tables.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn list_by_week(&self, anchor: &WeekAnchor) -> StoreResult<Vec<Player>> {
        let tables = self.tables.read().await;
        Ok(tables
            .players
            .values()
            .filter(|p| p.is_in_week(anchor))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
