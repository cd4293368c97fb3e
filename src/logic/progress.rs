//! Progress updates: weekly rollover, then clamped counter deltas.

use chrono::NaiveDate;

use crate::models::{ExternalId, Player, ProgressDelta, ProgressError, WeekAnchor};
use crate::storage::PlayerStore;

/// Apply `delta` to the player linked to `external_id`.
///
/// If the stored week anchor is not `today`'s week, weekly taps are zeroed first and the
/// anchor moves forward; the tap delta then lands in the new week. Every counter ends at
/// `max(0, old + delta)`. Fails with `PlayerNotFound` (store untouched) for unknown ids.
pub async fn apply_progress(
    store: &dyn PlayerStore,
    today: NaiveDate,
    external_id: ExternalId,
    delta: ProgressDelta,
) -> Result<Player, ProgressError> {
    let mut player = store
        .get_by_external_id(external_id)
        .await?
        .ok_or(ProgressError::PlayerNotFound(external_id))?;

    let current = WeekAnchor::for_date(today);
    let previous = player.week_anchor.clone();
    if player.roll_week(&current) {
        log::info!(
            "Player {} rolled over from {} to {}, weekly taps reset",
            player.id,
            previous,
            current
        );
    }
    player.apply_delta(&delta);

    store.update(&player).await?;
    log::debug!(
        "Applied progress to player {}: coins={} diamonds={} xp={} weekly_taps={}",
        player.id,
        player.coins,
        player.diamonds,
        player.xp,
        player.weekly_taps
    );
    Ok(player)
}
