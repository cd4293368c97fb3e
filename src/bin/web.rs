//! Single binary web server for tap progress: players, progress updates, weekly leaderboard.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Configure with env: HOST, PORT, STORAGE_BACKEND
//! (sled | memory), DATABASE_PATH, WEBAPP_ORIGIN, RUST_LOG.

use actix_cors::Cors;
use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use std::sync::Arc;
use tap_progress::{
    api::{self, AppState},
    Config, MemoryStore, PlayerStore, SledStore, StorageBackend, SystemClock,
};

fn open_store(config: &Config) -> std::io::Result<Arc<dyn PlayerStore>> {
    match config.storage {
        StorageBackend::Sled => {
            log::info!("Opening player store at {}", config.database_path.display());
            let store = SledStore::open(&config.database_path)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory player store; progress is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials();
    if config.allows_any_origin() {
        cors.allow_any_origin()
    } else {
        cors.allowed_origin(&config.webapp_origin)
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let store = open_store(&config)?;
    let state = Data::new(AppState::new(store, Arc::new(SystemClock)));

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&config))
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
