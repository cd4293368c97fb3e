//! Player record and its public view.

use crate::models::week::WeekAnchor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque internal identifier for a player (primary key).
pub type PlayerId = Uuid;

/// Identifier assigned to the user by the originating chat platform.
pub type ExternalId = i64;

/// Signed adjustments applied by a progress update.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ProgressDelta {
    pub coins: i64,
    pub diamonds: i64,
    pub xp: i64,
    pub taps: i64,
}

/// What callers see of a player (no week anchor).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub external_id: Option<ExternalId>,
    pub display_name: Option<String>,
    pub coins: u64,
    pub diamonds: u64,
    pub xp: u64,
    pub weekly_taps: u64,
}

impl PlayerView {
    pub fn from_player(p: &Player) -> Self {
        Self {
            id: p.id,
            external_id: p.external_id,
            display_name: p.display_name.clone(),
            coins: p.coins,
            diamonds: p.diamonds,
            xp: p.xp,
            weekly_taps: p.weekly_taps,
        }
    }
}

/// A stored player. Counters are unsigned, so they can never go below zero.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub external_id: Option<ExternalId>,
    pub display_name: Option<String>,
    pub coins: u64,
    pub diamonds: u64,
    pub xp: u64,
    /// Taps in `week_anchor`'s week; stale once the anchor is behind.
    pub weekly_taps: u64,
    pub week_anchor: WeekAnchor,
}

impl Player {
    /// New player linked to `external_id`, all counters at zero. Empty names are dropped.
    pub fn new(external_id: ExternalId, display_name: Option<&str>, week_anchor: WeekAnchor) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id: Some(external_id),
            display_name: display_name.filter(|n| !n.is_empty()).map(str::to_string),
            coins: 0,
            diamonds: 0,
            xp: 0,
            weekly_taps: 0,
            week_anchor,
        }
    }

    pub fn view(&self) -> PlayerView {
        PlayerView::from_player(self)
    }

    /// Replace the display name if `name` is non-empty and different. Returns whether it changed.
    pub fn refresh_display_name(&mut self, name: Option<&str>) -> bool {
        match name {
            Some(n) if !n.is_empty() && self.display_name.as_deref() != Some(n) => {
                self.display_name = Some(n.to_string());
                true
            }
            _ => false,
        }
    }

    /// Move to `current` week, zeroing weekly taps if the stored anchor is stale.
    /// Returns whether a rollover happened.
    pub fn roll_week(&mut self, current: &WeekAnchor) -> bool {
        if &self.week_anchor == current {
            return false;
        }
        self.week_anchor = current.clone();
        self.weekly_taps = 0;
        true
    }

    /// Apply each delta independently as `max(0, old + delta)`.
    pub fn apply_delta(&mut self, delta: &ProgressDelta) {
        self.coins = clamped_add(self.coins, delta.coins);
        self.diamonds = clamped_add(self.diamonds, delta.diamonds);
        self.xp = clamped_add(self.xp, delta.xp);
        self.weekly_taps = clamped_add(self.weekly_taps, delta.taps);
    }

    pub fn is_in_week(&self, anchor: &WeekAnchor) -> bool {
        &self.week_anchor == anchor
    }
}

/// `max(0, value + delta)`, saturating at `u64::MAX`.
pub fn clamped_add(value: u64, delta: i64) -> u64 {
    value.saturating_add_signed(delta)
}
