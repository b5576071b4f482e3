//! Configuration layer: reads runtime settings from environment variables
//! and exposes strongly typed configs for the notes folder and embeddings.

use std::path::PathBuf;

use crate::errors::note_index_error::NoteIndexError;

/// Which embedding backend produces vectors for names and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Local ONNX model through `fastembed`.
    FastEmbed,
    /// Remote Ollama server (`/api/embeddings`).
    Ollama,
    /// Feature-hashing bag of words, no model required.
    Hashing,
}

impl EmbeddingBackend {
    /// Parse from env string (case-insensitive). Defaults to FastEmbed.
    pub fn from_env(s: Option<String>) -> Result<Self, NoteIndexError> {
        let Some(raw) = s.filter(|v| !v.trim().is_empty()) else {
            return Ok(EmbeddingBackend::FastEmbed);
        };
        match raw.trim().to_lowercase().as_str() {
            "fastembed" | "local" => Ok(EmbeddingBackend::FastEmbed),
            "ollama" => Ok(EmbeddingBackend::Ollama),
            "hashing" | "hash" => Ok(EmbeddingBackend::Hashing),
            _ => Err(NoteIndexError::EnvParse {
                key: "EMBED_PROVIDER".into(),
                value: raw,
            }),
        }
    }
}

/// Embedding configuration (backend, model and backend-specific knobs).
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// Model identifier, e.g. "all-MiniLM-L6-v2".
    pub model: String,
    /// Where fastembed keeps downloaded model files.
    pub cache_dir: Option<PathBuf>,
    /// Ollama base URL.
    pub ollama_url: String,
    /// Per-request timeout for remote backends.
    pub timeout_secs: u64,
    /// Vector size of the hashing backend.
    pub hashing_dim: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::FastEmbed,
            model: DEFAULT_MODEL_NAME.to_string(),
            cache_dir: None,
            ollama_url: "http://localhost:11434".to_string(),
            timeout_secs: 60,
            hashing_dim: 384,
        }
    }
}

/// Default sentence-embedding model.
pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Top-level runtime configuration for the note index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Folder scanned (non-recursively) at startup.
    pub notes_folder: PathBuf,
    /// Recognized file extension without the dot, matched case-insensitively.
    pub extension: String,
    pub embedding: EmbeddingConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            notes_folder: PathBuf::from("notes"),
            extension: "pdf".to_string(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl IndexConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `NOTES_FOLDER` (default: "notes")
    /// - `NOTES_EXTENSION` (default: "pdf")
    /// - `EMBED_PROVIDER` (values: "fastembed" | "ollama" | "hashing"; default: "fastembed")
    /// - `EMBED_MODEL_NAME` (default: "all-MiniLM-L6-v2")
    /// - `EMBED_CACHE_DIR` (optional)
    /// - `OLLAMA_URL` (default: "http://localhost:11434")
    /// - `EMBED_TIMEOUT_SECS` (default: 60)
    /// - `HASHING_DIM` (default: 384)
    pub fn from_env() -> Result<Self, NoteIndexError> {
        let defaults = IndexConfig::default();

        let notes_folder = non_empty_env("NOTES_FOLDER")
            .map(PathBuf::from)
            .unwrap_or(defaults.notes_folder);

        let extension = non_empty_env("NOTES_EXTENSION")
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .unwrap_or(defaults.extension);

        let embedding = EmbeddingConfig {
            backend: EmbeddingBackend::from_env(std::env::var("EMBED_PROVIDER").ok())?,
            model: non_empty_env("EMBED_MODEL_NAME").unwrap_or(defaults.embedding.model),
            cache_dir: non_empty_env("EMBED_CACHE_DIR").map(PathBuf::from),
            ollama_url: non_empty_env("OLLAMA_URL").unwrap_or(defaults.embedding.ollama_url),
            timeout_secs: read_u64_env("EMBED_TIMEOUT_SECS")?
                .unwrap_or(defaults.embedding.timeout_secs),
            hashing_dim: read_usize_env("HASHING_DIM")?.unwrap_or(defaults.embedding.hashing_dim),
        };

        let cfg = Self {
            notes_folder,
            extension,
            embedding,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), NoteIndexError> {
        if self.extension.is_empty() {
            return Err(NoteIndexError::InvalidConfig(
                "NOTES_EXTENSION must not be empty".into(),
            ));
        }
        if self.embedding.hashing_dim == 0 {
            return Err(NoteIndexError::InvalidConfig("HASHING_DIM must be > 0".into()));
        }
        if self.embedding.timeout_secs == 0 {
            return Err(NoteIndexError::InvalidConfig(
                "EMBED_TIMEOUT_SECS must be > 0".into(),
            ));
        }
        let url = self.embedding.ollama_url.as_str();
        if self.embedding.backend == EmbeddingBackend::Ollama
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(NoteIndexError::InvalidConfig(
                "OLLAMA_URL must start with http:// or https://".into(),
            ));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Read an optional `usize` from env; set-but-invalid is an error.
fn read_usize_env(key: &str) -> Result<Option<usize>, NoteIndexError> {
    match non_empty_env(key) {
        Some(v) => v
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| NoteIndexError::EnvParse {
                key: key.into(),
                value: v,
            }),
        None => Ok(None),
    }
}

/// Read an optional `u64` from env; set-but-invalid is an error.
fn read_u64_env(key: &str) -> Result<Option<u64>, NoteIndexError> {
    match non_empty_env(key) {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| NoteIndexError::EnvParse {
                key: key.into(),
                value: v,
            }),
        None => Ok(None),
    }
}
