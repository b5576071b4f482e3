//! Startup lifecycle and the query matcher.
//!
//! [`SearchState::initialize`] runs once before the server accepts requests and
//! ends either `Ready` or `Degraded`. The result is never mutated afterwards.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::embedding::{EmbeddingsProvider, load_provider};
use crate::errors::match_error::MatchError;
use crate::note_index::{NoteIndex, build_index};
use crate::structs::index_config::IndexConfig;
use crate::structs::note_entry::NoteMatch;

/// Read-only search state shared by all request handlers.
pub enum SearchState {
    /// Provider loaded and index built (possibly with zero documents).
    Ready {
        index: NoteIndex,
        embedder: Arc<dyn EmbeddingsProvider>,
    },
    /// Provider could not be loaded or failed while embedding names.
    Degraded { reason: String },
}

impl SearchState {
    /// Loads the configured provider and builds the index.
    ///
    /// Never fails: any provider or build error turns into [`SearchState::Degraded`].
    pub async fn initialize(cfg: &IndexConfig) -> Self {
        match load_provider(&cfg.embedding).await {
            Ok(embedder) => Self::with_provider(&cfg.notes_folder, &cfg.extension, embedder).await,
            Err(err) => {
                error!(
                    target: "note_index::state",
                    error = %err,
                    "embedding provider unavailable; search disabled"
                );
                Self::degraded(err.to_string())
            }
        }
    }

    /// Builds the index with an already constructed provider.
    pub async fn with_provider(
        folder: &Path,
        extension: &str,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Self {
        match build_index(folder, extension, embedder.as_ref()).await {
            Ok(index) => {
                info!(
                    target: "note_index::state",
                    documents = index.len(),
                    model = embedder.model_name(),
                    "search state ready"
                );
                SearchState::Ready { index, embedder }
            }
            Err(err) => {
                error!(
                    target: "note_index::state",
                    error = %err,
                    "index build failed; search disabled"
                );
                Self::degraded(err.to_string())
            }
        }
    }

    pub fn degraded(reason: impl Into<String>) -> Self {
        SearchState::Degraded {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SearchState::Ready { .. })
    }

    /// Indexed documents; zero while degraded.
    pub fn document_count(&self) -> usize {
        match self {
            SearchState::Ready { index, .. } => index.len(),
            SearchState::Degraded { .. } => 0,
        }
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            SearchState::Ready { .. } => None,
            SearchState::Degraded { reason } => Some(reason),
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        match self {
            SearchState::Ready { embedder, .. } => Some(embedder.model_name()),
            SearchState::Degraded { .. } => None,
        }
    }

    /// True when `filename` is one of the indexed files.
    pub fn contains_file(&self, filename: &str) -> bool {
        match self {
            SearchState::Ready { index, .. } => index.contains_file(filename),
            SearchState::Degraded { .. } => false,
        }
    }

    /// Top-1 match for `query`.
    ///
    /// Checks run in order: provider availability, blank query, empty index.
    pub async fn find_best_match(&self, query: &str) -> Result<NoteMatch, MatchError> {
        match self {
            SearchState::Degraded { reason } => Err(MatchError::ModelUnavailable {
                details: Some(reason.clone()),
            }),
            SearchState::Ready { index, embedder } => {
                match_query(query, index, embedder.as_ref()).await
            }
        }
    }
}

/// Embeds `query` and returns the most similar entry of `index`.
///
/// # Errors
/// - [`MatchError::EmptyQuery`] for blank input.
/// - [`MatchError::NoDocuments`] when the index is empty.
/// - [`MatchError::ModelUnavailable`] when the provider fails on the query
///   or returns a vector of a different dimension than the index.
pub async fn match_query(
    query: &str,
    index: &NoteIndex,
    embedder: &dyn EmbeddingsProvider,
) -> Result<NoteMatch, MatchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(MatchError::EmptyQuery);
    }
    if index.is_empty() {
        return Err(MatchError::NoDocuments);
    }

    let query_vec = embedder
        .embed(query)
        .await
        .map_err(|e| MatchError::ModelUnavailable {
            details: Some(e.to_string()),
        })?;

    if let Some(dim) = index.dimension().filter(|d| *d != query_vec.len()) {
        return Err(MatchError::ModelUnavailable {
            details: Some(format!(
                "query embedding has {} dimensions, index has {dim}",
                query_vec.len()
            )),
        });
    }

    let best = index.best_match(&query_vec).ok_or(MatchError::NoDocuments)?;
    debug!(
        target: "note_index::match",
        query,
        filename = %best.filename,
        score = best.score,
        "match_query: hit"
    );
    Ok(best)
}
