//! Integration tests for the weekly leaderboard.

use chrono::NaiveDate;
use tap_progress::{
    apply_progress, fetch_or_create_player, weekly_leaderboard, LeaderboardLimit, MemoryStore,
    ProgressDelta, SledStore,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn player_with_taps(store: &dyn tap_progress::PlayerStore, today: NaiveDate, id: i64, taps: i64) {
    fetch_or_create_player(store, today, id, Some(&format!("P{id}"))).await.unwrap();
    apply_progress(
        store,
        today,
        id,
        ProgressDelta {
            taps,
            ..Default::default()
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn sorted_descending_and_truncated() {
    let store = MemoryStore::new();
    let today = date(2024, 6, 12);
    for (id, taps) in [(1, 5), (2, 30), (3, 12), (4, 0), (5, 18)] {
        player_with_taps(&store, today, id, taps).await;
    }

    let top = weekly_leaderboard(&store, today, LeaderboardLimit::new(3).unwrap()).await.unwrap();
    let ranked: Vec<(Option<i64>, u64)> = top.iter().map(|p| (p.external_id, p.weekly_taps)).collect();
    assert_eq!(ranked, vec![(Some(2), 30), (Some(5), 18), (Some(3), 12)]);

    let all = weekly_leaderboard(&store, today, LeaderboardLimit::new(100).unwrap()).await.unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].weekly_taps >= w[1].weekly_taps));
}

#[tokio::test]
async fn stale_players_are_excluded_even_with_high_taps() {
    let store = MemoryStore::new();
    let last_week = date(2024, 6, 5);
    let this_week = date(2024, 6, 12);
    player_with_taps(&store, last_week, 1, 1_000).await;
    player_with_taps(&store, this_week, 2, 3).await;

    let board = weekly_leaderboard(&store, this_week, LeaderboardLimit::default()).await.unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].external_id, Some(2));
}

#[tokio::test]
async fn fetch_only_player_stays_off_the_new_week() {
    let store = MemoryStore::new();
    let last_week = date(2024, 6, 5);
    let this_week = date(2024, 6, 12);
    player_with_taps(&store, last_week, 1, 40).await;
    fetch_or_create_player(&store, this_week, 1, Some("still here")).await.unwrap();

    let board = weekly_leaderboard(&store, this_week, LeaderboardLimit::default()).await.unwrap();
    assert!(board.is_empty());
}

#[tokio::test]
async fn ties_are_ordered_by_xp_then_id() {
    let store = MemoryStore::new();
    let today = date(2024, 6, 12);
    for id in 1..=3 {
        player_with_taps(&store, today, id, 10).await;
    }
    apply_progress(
        &store,
        today,
        3,
        ProgressDelta {
            xp: 7,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let board = weekly_leaderboard(&store, today, LeaderboardLimit::default()).await.unwrap();
    assert_eq!(board[0].external_id, Some(3));
    assert!(board[1].id < board[2].id);
}

#[tokio::test]
async fn sled_store_ranks_current_week_only() {
    let store = SledStore::temporary().unwrap();
    let last_week = date(2024, 6, 5);
    let this_week = date(2024, 6, 12);
    player_with_taps(&store, last_week, 1, 99).await;
    player_with_taps(&store, this_week, 2, 4).await;
    player_with_taps(&store, this_week, 3, 9).await;
    // Player 1 comes back this week: rolls over and re-enters with only the new taps.
    apply_progress(
        &store,
        this_week,
        1,
        ProgressDelta {
            taps: 6,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let board = weekly_leaderboard(&store, this_week, LeaderboardLimit::default()).await.unwrap();
    let ranked: Vec<(Option<i64>, u64)> = board.iter().map(|p| (p.external_id, p.weekly_taps)).collect();
    assert_eq!(ranked, vec![(Some(3), 9), (Some(1), 6), (Some(2), 4)]);
}

#[test]
fn limit_outside_bounds_is_rejected() {
    assert!(LeaderboardLimit::new(0).is_err());
    assert!(LeaderboardLimit::new(101).is_err());
    assert_eq!(LeaderboardLimit::new(50).unwrap().get(), 50);
    assert_eq!(LeaderboardLimit::default().get(), 10);
}
