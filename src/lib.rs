//! Tap game progress tracker: library with models, storage, business logic and HTTP API.

pub mod api;
pub mod clock;
pub mod config;
pub mod logic;
pub mod models;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, StorageBackend};
pub use logic::{apply_progress, fetch_or_create_player, weekly_leaderboard, LeaderboardLimit};
pub use models::{
    week_anchor, ExternalId, Player, PlayerId, PlayerView, ProgressDelta, ProgressError, WeekAnchor,
};
pub use storage::{MemoryStore, PlayerStore, SledStore, StoreError};
