//! Server configuration from environment variables.
//!
//! HOST (default 0.0.0.0), PORT (8080), STORAGE_BACKEND (`sled` or `memory`),
//! DATABASE_PATH (data/players.sled), WEBAPP_ORIGIN (`*` allows any origin).

use std::path::PathBuf;
use std::str::FromStr;

/// Where player records live.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StorageBackend {
    #[default]
    Sled,
    /// Lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sled" => Ok(StorageBackend::Sled),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend {:?}", other)),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_path: PathBuf,
    /// Origin of the mini-app allowed by CORS; `*` means any.
    pub webapp_origin: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/players.sled")
}

fn default_webapp_origin() -> String {
    "*".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage: StorageBackend::default(),
            database_path: default_database_path(),
            webapp_origin: default_webapp_origin(),
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match non_empty("PORT") {
            Some(p) => p.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT {:?}, using {}", p, default_port());
                default_port()
            }),
            None => default_port(),
        };
        let storage = match non_empty("STORAGE_BACKEND") {
            Some(s) => s.parse().unwrap_or_else(|e| {
                log::warn!("{}, using sled", e);
                StorageBackend::Sled
            }),
            None => StorageBackend::default(),
        };

        Self {
            host: non_empty("HOST").unwrap_or_else(default_host),
            port,
            storage,
            database_path: non_empty("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            webapp_origin: non_empty("WEBAPP_ORIGIN").unwrap_or_else(default_webapp_origin),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.webapp_origin == "*"
    }
}
