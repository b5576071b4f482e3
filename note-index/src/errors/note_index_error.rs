//! Unified error type for building the note index.

use thiserror::Error;

/// Errors produced while configuring the index or building it at startup.
#[derive(Debug, Error)]
pub enum NoteIndexError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O & filesystem ────────────────────────────────────────────────────
    /// Underlying I/O error while listing the notes folder.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // ── Embeddings backend ──────────────────────────────────────────────────
    /// Embedding backend failed to initialize or to embed inputs.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Embeddings do not line up with the entries they belong to.
    #[error("index alignment error: {0}")]
    Alignment(String),
}
