//! Data structures for tap progress: players, week anchors, errors.

mod error;
mod player;
mod week;

pub use error::ProgressError;
pub use player::{clamped_add, ExternalId, Player, PlayerId, PlayerView, ProgressDelta};
pub use week::{week_anchor, InvalidWeekAnchor, WeekAnchor};
