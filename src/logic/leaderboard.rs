//! Weekly leaderboard: players active in the current ISO week, ranked by taps.

use chrono::NaiveDate;
use std::cmp::Reverse;

use crate::models::{Player, ProgressError, WeekAnchor};
use crate::storage::PlayerStore;

/// Number of leaderboard entries to return, always within `1..=100`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeaderboardLimit(usize);

impl LeaderboardLimit {
    pub const MIN: usize = 1;
    pub const MAX: usize = 100;
    pub const DEFAULT: usize = 10;

    pub fn new(limit: i64) -> Result<Self, ProgressError> {
        match usize::try_from(limit) {
            Ok(n) if (Self::MIN..=Self::MAX).contains(&n) => Ok(Self(n)),
            _ => Err(ProgressError::Validation(format!(
                "limit must be between {} and {} (got {})",
                Self::MIN,
                Self::MAX,
                limit
            ))),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for LeaderboardLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Top players of `today`'s week by weekly taps (descending).
///
/// Players whose anchor is from an earlier week are left out entirely. Ties are broken
/// by xp (descending), then by id.
pub async fn weekly_leaderboard(
    store: &dyn PlayerStore,
    today: NaiveDate,
    limit: LeaderboardLimit,
) -> Result<Vec<Player>, ProgressError> {
    let anchor = WeekAnchor::for_date(today);
    let mut players = store.list_by_week(&anchor).await?;
    players.retain(|p| p.is_in_week(&anchor));
    players.sort_by_key(|p| (Reverse(p.weekly_taps), Reverse(p.xp), p.id));
    players.truncate(limit.get());
    log::debug!("Leaderboard {}: {} entries", anchor, players.len());
    Ok(players)
}
