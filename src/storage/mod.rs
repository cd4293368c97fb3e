//! Player store: the only stateful component.
//!
//! Every write commits the record together with its secondary indexes
//! (external id, week anchor) or not at all.

pub mod memory;
pub mod sled;

use async_trait::async_trait;
use std::fmt;

use crate::models::{ExternalId, Player, PlayerId, WeekAnchor};

pub use self::memory::MemoryStore;
pub use self::sled::SledStore;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a [`PlayerStore`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// The storage engine failed (I/O, unavailable, aborted transaction).
    Backend(String),
    /// A stored record could not be encoded or decoded.
    Serialization(String),
    /// Another player is already linked to this external id.
    DuplicateExternalId(ExternalId),
    /// Update of a player that was never inserted.
    MissingPlayer(PlayerId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Backend(msg) => write!(f, "storage backend failure: {}", msg),
            StoreError::Serialization(msg) => write!(f, "corrupt player record: {}", msg),
            StoreError::DuplicateExternalId(id) => {
                write!(f, "external id {} is already linked to a player", id)
            }
            StoreError::MissingPlayer(id) => write!(f, "player {} does not exist", id),
        }
    }
}

impl std::error::Error for StoreError {}

/// Storage operations needed by the progress logic.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Look up the player linked to `external_id`.
    async fn get_by_external_id(&self, external_id: ExternalId) -> StoreResult<Option<Player>>;

    /// Insert a new player. Fails with `DuplicateExternalId` if the external id is taken.
    async fn insert(&self, player: &Player) -> StoreResult<()>;

    /// Overwrite an existing player (matched by `id`), keeping indexes in sync.
    async fn update(&self, player: &Player) -> StoreResult<()>;

    /// All players whose stored anchor equals `anchor`, in no particular order.
    async fn list_by_week(&self, anchor: &WeekAnchor) -> StoreResult<Vec<Player>>;

    /// Cheap liveness check for health probes.
    async fn ping(&self) -> StoreResult<()>;
}
