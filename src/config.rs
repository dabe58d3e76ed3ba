//! Server configuration from environment variables.

use crate::store::{FileBackend, MemoryBackend, StateStore};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATE_FILE: &str = "data/state.json";
const DEFAULT_STATIC_DIR: &str = "public";

/// Where the shared document lives.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BackendKind {
    File(PathBuf),
    Memory,
    /// No backing store: GET degrades to an empty state, POST fails.
    None,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    UnknownBackend(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownBackend(kind) => write!(
                f,
                "Unknown STATE_BACKEND '{}' (expected file, memory or none)",
                kind
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub backend: BackendKind,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Read HOST, PORT, STATE_BACKEND, STATE_FILE and STATIC_DIR.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let state_file = lookup("STATE_FILE").unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());
        let backend = match lookup("STATE_BACKEND")
            .map(|b| b.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("file") => BackendKind::File(PathBuf::from(state_file)),
            Some("memory") => BackendKind::Memory,
            Some("none") => BackendKind::None,
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };
        let static_dir =
            PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()));
        Ok(Self {
            host,
            port,
            backend,
            static_dir,
        })
    }

    pub fn build_store(&self) -> StateStore {
        match &self.backend {
            BackendKind::File(path) => StateStore::new(FileBackend::new(path.clone())),
            BackendKind::Memory => StateStore::new(MemoryBackend::new()),
            BackendKind::None => StateStore::unconfigured(),
        }
    }
}
