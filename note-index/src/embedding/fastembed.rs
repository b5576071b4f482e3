//! Local sentence-embedding backend on top of `fastembed` (ONNX runtime).
//!
//! The model is loaded once; every call takes the mutex and runs the forward
//! pass on the blocking thread pool.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ::fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
use tracing::{debug, info};

use super::{EmbedFuture, EmbeddingsProvider};
use crate::errors::note_index_error::NoteIndexError;

/// Embedding provider backed by a locally loaded model.
#[derive(Clone)]
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
}

impl FastEmbedder {
    /// Loads `model_name` synchronously (may download model files).
    ///
    /// # Errors
    /// Returns [`NoteIndexError::Embedding`] for unknown model names and load failures.
    pub fn new(model_name: &str, cache_dir: Option<PathBuf>) -> Result<Self, NoteIndexError> {
        let model = resolve_model(model_name)?;

        let mut options = TextInitOptions::new(model);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let text_embedding = TextEmbedding::try_new(options).map_err(|e| {
            NoteIndexError::Embedding(format!("failed to load model '{model_name}': {e}"))
        })?;

        info!(target: "note_index::embedding", model = model_name, "fastembed model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(text_embedding)),
            model_name: model_name.to_string(),
        })
    }

    /// Async wrapper around [`FastEmbedder::new`] that keeps the load off the runtime workers.
    pub async fn load(model_name: String, cache_dir: Option<PathBuf>) -> Result<Self, NoteIndexError> {
        tokio::task::spawn_blocking(move || Self::new(&model_name, cache_dir))
            .await
            .map_err(|e| NoteIndexError::Embedding(format!("model load task failed: {e}")))?
    }
}

impl EmbeddingsProvider for FastEmbedder {
    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        Box::pin(async move {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            debug!(target: "note_index::embedding", count = texts.len(), "fastembed batch");

            tokio::task::spawn_blocking(move || {
                let mut guard = model
                    .lock()
                    .map_err(|_| NoteIndexError::Embedding("embedding model lock poisoned".into()))?;
                guard
                    .embed(texts, None)
                    .map_err(|e| NoteIndexError::Embedding(format!("fastembed: {e}")))
            })
            .await
            .map_err(|e| NoteIndexError::Embedding(format!("embedding task failed: {e}")))?
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("model_name", &self.model_name)
            .finish()
    }
}

/// Maps sentence-transformers style names onto fastembed models; anything else
/// goes through fastembed's own model-code parser.
fn resolve_model(name: &str) -> Result<EmbeddingModel, NoteIndexError> {
    let short = name
        .trim()
        .trim_start_matches("sentence-transformers/")
        .to_lowercase();

    match short.as_str() {
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "paraphrase-multilingual-minilm-l12-v2" => Ok(EmbeddingModel::ParaphraseMLMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        _ => name
            .trim()
            .parse::<EmbeddingModel>()
            .map_err(|e| NoteIndexError::Embedding(format!("unknown embedding model '{name}': {e}"))),
    }
}
