//! Registration: fetch an existing player or create one on first contact.

use chrono::NaiveDate;

use crate::models::{ExternalId, Player, ProgressError, WeekAnchor};
use crate::storage::{PlayerStore, StoreError};

/// Return the player linked to `external_id`, creating it (zeroed, anchored at `today`)
/// if none exists. A non-empty `display_name` that differs from the stored one replaces it.
///
/// Never touches counters or the week anchor of an existing player.
pub async fn fetch_or_create_player(
    store: &dyn PlayerStore,
    today: NaiveDate,
    external_id: ExternalId,
    display_name: Option<&str>,
) -> Result<Player, ProgressError> {
    if let Some(player) = store.get_by_external_id(external_id).await? {
        return refresh_name(store, player, display_name).await;
    }

    let player = Player::new(external_id, display_name, WeekAnchor::for_date(today));
    match store.insert(&player).await {
        Ok(()) => {
            log::info!(
                "Registered player {} for external id {} ({})",
                player.id,
                external_id,
                player.week_anchor
            );
            Ok(player)
        }
        // Lost a race with another first-contact request: use the winner's record.
        Err(StoreError::DuplicateExternalId(_)) => {
            match store.get_by_external_id(external_id).await? {
                Some(existing) => refresh_name(store, existing, display_name).await,
                None => Err(StoreError::DuplicateExternalId(external_id).into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

async fn refresh_name(
    store: &dyn PlayerStore,
    mut player: Player,
    display_name: Option<&str>,
) -> Result<Player, ProgressError> {
    if player.refresh_display_name(display_name) {
        store.update(&player).await?;
        log::debug!("Updated display name of player {}", player.id);
    }
    Ok(player)
}
