//! REST API: player registration, progress updates, weekly leaderboard, health.
//!
//! Routes:
//! - GET  /health
//! - POST /players/me
//! - POST /progress/update
//! - GET  /leaderboard/weekly?limit=N

pub mod dto;

use actix_web::{
    error::InternalError,
    get, post,
    web::{self, Data, Json, Query},
    HttpResponse, Responder,
};
use std::sync::Arc;

use crate::clock::Clock;
use crate::logic::{apply_progress, fetch_or_create_player, weekly_leaderboard};
use crate::models::{PlayerView, ProgressError};
use crate::storage::PlayerStore;
use dto::{LeaderboardQuery, PlayerMeBody, ProgressBody};

/// Shared by all workers: the player store and the date source.
pub struct AppState {
    pub store: Arc<dyn PlayerStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn PlayerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

type State = Data<AppState>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

fn error_json(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

/// Map a progress error to a response: 404, 400, or 500 for storage failures.
pub fn error_response(e: &ProgressError) -> HttpResponse {
    match e {
        ProgressError::PlayerNotFound(_) => HttpResponse::NotFound().json(error_json(e)),
        ProgressError::Validation(_) => HttpResponse::BadRequest().json(error_json(e)),
        ProgressError::Storage(inner) => {
            log::error!("Storage failure: {}", inner);
            HttpResponse::InternalServerError().json(error_json("Storage unavailable"))
        }
    }
}

/// Malformed JSON bodies become 400 with the usual error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(error_json(format!("Invalid request body: {}", err)));
        InternalError::from_response(err, response).into()
    })
}

/// Malformed query strings (e.g. `limit=abc`) become 400.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(error_json(format!("Invalid query: {}", err)));
        InternalError::from_response(err, response).into()
    })
}

#[get("/health")]
async fn health(state: State) -> impl Responder {
    match state.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            ok: true,
            service: "tap-progress",
        }),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                ok: false,
                service: "tap-progress",
            })
        }
    }
}

/// Fetch or create the caller's player; refreshes the display name when a new one is sent.
#[post("/players/me")]
async fn players_me(state: State, body: Json<PlayerMeBody>) -> HttpResponse {
    let body = match body.into_inner().validate() {
        Ok(b) => b,
        Err(e) => return error_response(&e),
    };
    let today = state.clock.today();
    match fetch_or_create_player(
        state.store.as_ref(),
        today,
        body.external_id,
        body.display_name.as_deref(),
    )
    .await
    {
        Ok(player) => HttpResponse::Ok().json(player.view()),
        Err(e) => error_response(&e),
    }
}

/// Apply coin/diamond/xp/tap deltas (404 if the player was never registered).
#[post("/progress/update")]
async fn progress_update(state: State, body: Json<ProgressBody>) -> HttpResponse {
    let today = state.clock.today();
    match apply_progress(state.store.as_ref(), today, body.external_id, body.delta()).await {
        Ok(player) => HttpResponse::Ok().json(player.view()),
        Err(e) => error_response(&e),
    }
}

#[get("/leaderboard/weekly")]
async fn leaderboard_weekly(state: State, query: Query<LeaderboardQuery>) -> HttpResponse {
    let limit = match query.limit() {
        Ok(l) => l,
        Err(e) => return error_response(&e),
    };
    let today = state.clock.today();
    match weekly_leaderboard(state.store.as_ref(), today, limit).await {
        Ok(players) => {
            let views: Vec<PlayerView> = players.iter().map(PlayerView::from_player).collect();
            HttpResponse::Ok().json(views)
        }
        Err(e) => error_response(&e),
    }
}

/// Register routes and extractor configs. The caller supplies `Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(health)
        .service(players_me)
        .service(progress_update)
        .service(leaderboard_weekly);
}
