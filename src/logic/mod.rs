//! Progress business logic: registration, progress updates, weekly leaderboard.

mod leaderboard;
mod players;
mod progress;

pub use leaderboard::{weekly_leaderboard, LeaderboardLimit};
pub use players::fetch_or_create_player;
pub use progress::apply_progress;
