//! The in-memory index and its builder.

use std::path::Path;

use tracing::info;

use crate::embedding::EmbeddingsProvider;
use crate::errors::note_index_error::NoteIndexError;
use crate::scan::scan_notes_folder;
use crate::similarity::{cosine, stable_argmax};
use crate::structs::note_entry::{NoteEntry, NoteMatch};

/// Entries positionally aligned with their embedding rows.
///
/// Invariant: `embeddings.len() == entries.len()` and every row has the same length.
#[derive(Debug, Clone, Default)]
pub struct NoteIndex {
    entries: Vec<NoteEntry>,
    embeddings: Vec<Vec<f32>>,
}

impl NoteIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// # Errors
    /// [`NoteIndexError::Alignment`] when row count or row lengths disagree.
    pub fn new(entries: Vec<NoteEntry>, embeddings: Vec<Vec<f32>>) -> Result<Self, NoteIndexError> {
        if entries.len() != embeddings.len() {
            return Err(NoteIndexError::Alignment(format!(
                "{} entries but {} embeddings",
                entries.len(),
                embeddings.len()
            )));
        }
        if let Some(first) = embeddings.first() {
            let dim = first.len();
            if dim == 0 {
                return Err(NoteIndexError::Alignment("embeddings are empty vectors".into()));
            }
            if let Some(bad) = embeddings.iter().position(|row| row.len() != dim) {
                return Err(NoteIndexError::Alignment(format!(
                    "row {bad} has {} dims, expected {dim}",
                    embeddings[bad].len()
                )));
            }
        }
        Ok(Self {
            entries,
            embeddings,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NoteEntry] {
        &self.entries
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    /// Vector length of the rows, `None` for an empty index.
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }

    pub fn contains_file(&self, filename: &str) -> bool {
        self.entries.iter().any(|e| e.filename == filename)
    }

    /// Similarity of `query` against every row, in entry order.
    pub fn scores(&self, query: &[f32]) -> Vec<f32> {
        self.embeddings.iter().map(|row| cosine(query, row)).collect()
    }

    /// Highest-scoring entry; the earliest entry wins ties. `None` only when empty.
    pub fn best_match(&self, query: &[f32]) -> Option<NoteMatch> {
        let (idx, score) = stable_argmax(self.embeddings.iter().map(|row| cosine(query, row)))?;
        let entry = &self.entries[idx];
        Some(NoteMatch {
            display_name: entry.display_name.clone(),
            filename: entry.filename.clone(),
            score,
        })
    }
}

/// Scans `folder` and embeds every display name.
///
/// The embedder is not called when nothing matches.
///
/// # Errors
/// - [`NoteIndexError::Io`] if the folder exists but cannot be listed.
/// - [`NoteIndexError::Embedding`] if the provider fails.
/// - [`NoteIndexError::Alignment`] if the provider returns the wrong number or shape of vectors.
#[tracing::instrument(
    target = "note_index::build",
    skip_all,
    fields(folder = %folder.display(), extension = %extension)
)]
pub async fn build_index(
    folder: &Path,
    extension: &str,
    embedder: &dyn EmbeddingsProvider,
) -> Result<NoteIndex, NoteIndexError> {
    info!(
        target: "note_index::build",
        folder = %folder.display(),
        extension,
        model = embedder.model_name(),
        "build_index: start"
    );

    let entries = scan_notes_folder(folder, extension)?;
    if entries.is_empty() {
        return Ok(NoteIndex::empty());
    }

    let names: Vec<String> = entries.iter().map(|e| e.display_name.clone()).collect();
    let embeddings = embedder.embed_batch(&names).await?;
    let index = NoteIndex::new(entries, embeddings)?;

    info!(
        target: "note_index::build",
        documents = index.len(),
        dim = index.dimension().unwrap_or(0),
        "build_index: done"
    );
    Ok(index)
}
