//! Durable player store on the sled embedded database.
//!
//! Layout:
//! - `players`: player id bytes -> JSON record
//! - `players_by_external_id`: big-endian external id -> player id bytes
//! - `players_by_week`: `"{anchor}/"` + player id bytes -> empty (leaderboard scan)

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionalTree};
use sled::Transactional;
use std::path::Path;

use super::{PlayerStore, StoreError, StoreResult};
use crate::models::{ExternalId, Player, PlayerId, WeekAnchor};

const PLAYERS_TREE: &str = "players";
const EXTERNAL_ID_INDEX_TREE: &str = "players_by_external_id";
const WEEK_INDEX_TREE: &str = "players_by_week";

/// Sled-backed [`PlayerStore`]. Cloning shares the same database.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    players: sled::Tree,
    by_external_id: sled::Tree,
    by_week: sled::Tree,
}

type TxResult<T> = Result<T, ConflictableTransactionError<StoreError>>;

impl SledStore {
    /// Open or create the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path).map_err(|e| backend("open sled db", e))?;
        Self::from_db(db)
    }

    /// Throwaway database that is removed when dropped.
    pub fn temporary() -> StoreResult<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| backend("open temporary sled db", e))?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> StoreResult<Self> {
        let players = db
            .open_tree(PLAYERS_TREE)
            .map_err(|e| backend("open players tree", e))?;
        let by_external_id = db
            .open_tree(EXTERNAL_ID_INDEX_TREE)
            .map_err(|e| backend("open external id index", e))?;
        let by_week = db
            .open_tree(WEEK_INDEX_TREE)
            .map_err(|e| backend("open week index", e))?;
        Ok(Self {
            db,
            players,
            by_external_id,
            by_week,
        })
    }

    /// Flush pending writes to disk.
    pub async fn flush(&self) -> StoreResult<()> {
        self.db
            .flush_async()
            .await
            .map_err(|e| backend("flush", e))?;
        Ok(())
    }

    fn serialize<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn player_key(id: &PlayerId) -> [u8; 16] {
        *id.as_bytes()
    }

    fn external_id_key(external_id: ExternalId) -> [u8; 8] {
        external_id.to_be_bytes()
    }

    fn week_prefix(anchor: &WeekAnchor) -> Vec<u8> {
        let mut key = anchor.as_str().as_bytes().to_vec();
        key.push(b'/');
        key
    }

    fn week_key(anchor: &WeekAnchor, id: &PlayerId) -> Vec<u8> {
        let mut key = Self::week_prefix(anchor);
        key.extend_from_slice(id.as_bytes());
        key
    }

    fn decode_player_id(bytes: &[u8]) -> StoreResult<PlayerId> {
        PlayerId::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Write `player` and its index entries, replacing `old` entries if given.
    fn write_in_tx(
        players: &TransactionalTree,
        by_external_id: &TransactionalTree,
        by_week: &TransactionalTree,
        old: Option<&Player>,
        player: &Player,
        value: &[u8],
    ) -> TxResult<()> {
        if let Some(old) = old {
            if old.external_id != player.external_id {
                if let Some(ext) = old.external_id {
                    by_external_id.remove(&Self::external_id_key(ext)[..])?;
                }
            }
            if old.week_anchor != player.week_anchor {
                by_week.remove(Self::week_key(&old.week_anchor, &old.id))?;
            }
        }
        if let Some(ext) = player.external_id {
            let key = Self::external_id_key(ext);
            if let Some(owner) = by_external_id.get(key)? {
                if owner[..] != player.id.as_bytes()[..] {
                    return Err(ConflictableTransactionError::Abort(
                        StoreError::DuplicateExternalId(ext),
                    ));
                }
            }
            by_external_id.insert(&key[..], &Self::player_key(&player.id)[..])?;
        }
        by_week.insert(Self::week_key(&player.week_anchor, &player.id), &[] as &[u8])?;
        players.insert(&Self::player_key(&player.id)[..], value)?;
        Ok(())
    }

    fn run_tx<F>(&self, f: F) -> StoreResult<()>
    where
        F: Fn(&TransactionalTree, &TransactionalTree, &TransactionalTree) -> TxResult<()>,
    {
        (&self.players, &self.by_external_id, &self.by_week)
            .transaction(|(players, by_external_id, by_week)| f(players, by_external_id, by_week))
            .map_err(|e| match e {
                TransactionError::Abort(e) => e,
                TransactionError::Storage(e) => backend("commit transaction", e),
            })
    }
}

fn backend(what: &str, e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("Failed to {}: {}", what, e))
}

fn decode_in_tx(bytes: &[u8]) -> TxResult<Player> {
    SledStore::deserialize(bytes).map_err(ConflictableTransactionError::Abort)
}

#[async_trait]
impl PlayerStore for SledStore {
    async fn get_by_external_id(&self, external_id: ExternalId) -> StoreResult<Option<Player>> {
        let key = Self::external_id_key(external_id);
        let id = match self
            .by_external_id
            .get(key)
            .map_err(|e| backend("read external id index", e))?
        {
            Some(bytes) => Self::decode_player_id(&bytes)?,
            None => return Ok(None),
        };
        match self
            .players
            .get(Self::player_key(&id))
            .map_err(|e| backend("read player", e))?
        {
            Some(bytes) => Ok(Some(Self::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, player: &Player) -> StoreResult<()> {
        let value = Self::serialize(player)?;
        self.run_tx(|players, by_external_id, by_week| {
            Self::write_in_tx(players, by_external_id, by_week, None, player, &value)
        })
    }

    async fn update(&self, player: &Player) -> StoreResult<()> {
        let value = Self::serialize(player)?;
        self.run_tx(|players, by_external_id, by_week| {
            let old = match players.get(Self::player_key(&player.id))? {
                Some(bytes) => decode_in_tx(&bytes)?,
                None => {
                    return Err(ConflictableTransactionError::Abort(
                        StoreError::MissingPlayer(player.id),
                    ))
                }
            };
            Self::write_in_tx(players, by_external_id, by_week, Some(&old), player, &value)
        })
    }

    async fn list_by_week(&self, anchor: &WeekAnchor) -> StoreResult<Vec<Player>> {
        let prefix = Self::week_prefix(anchor);
        let mut players = Vec::new();
        for item in self.by_week.scan_prefix(&prefix) {
            let (key, _) = item.map_err(|e| backend("iterate week index", e))?;
            let id = Self::decode_player_id(&key[prefix.len()..])?;
            let bytes = self
                .players
                .get(Self::player_key(&id))
                .map_err(|e| backend("read player", e))?;
            // Index and record are written together; a miss means a concurrent rewrite.
            if let Some(bytes) = bytes {
                let player: Player = Self::deserialize(&bytes)?;
                if player.is_in_week(anchor) {
                    players.push(player);
                }
            }
        }
        Ok(players)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.players
            .first()
            .map_err(|e| backend("read players tree", e))?;
        Ok(())
    }
}
