use std::path::PathBuf;

use note_index::SearchState;
use thiserror::Error;

/// Shared state for all HTTP handlers. Built once before the listener starts.
pub struct AppState {
    /// Index lifecycle result (ready or degraded).
    pub search: SearchState,
    /// Folder the indexed files are served from.
    pub notes_folder: PathBuf,
}

impl AppState {
    pub fn new(search: SearchState, notes_folder: impl Into<PathBuf>) -> Self {
        Self {
            search,
            notes_folder: notes_folder.into(),
        }
    }
}

/// Errors while reading the listener configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid number in {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: String,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 5000;

    /// `API_ADDRESS` if set, otherwise `0.0.0.0:{PORT}` (default port 5000).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var("API_ADDRESS").ok(),
            std::env::var("PORT").ok(),
        )
    }

    fn from_values(address: Option<String>, port: Option<String>) -> Result<Self, ConfigError> {
        if let Some(addr) = address.filter(|a| !a.trim().is_empty()) {
            return Ok(Self {
                address: addr.trim().to_string(),
            });
        }

        let port = match port.filter(|p| !p.trim().is_empty()) {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "PORT",
                    value: p,
                })?,
            None => Self::DEFAULT_PORT,
        };

        Ok(Self {
            address: format!("0.0.0.0:{port}"),
        })
    }
}
