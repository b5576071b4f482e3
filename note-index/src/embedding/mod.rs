//! Embedding abstraction and the bundled backends.
//!
//! Names are embedded once at startup and queries once per request, always
//! through the same [`EmbeddingsProvider`] so both live in one vector space.

pub mod fastembed;
pub mod hashing;
pub mod ollama;

use std::{future::Future, pin::Pin, sync::Arc};

use tracing::info;

use crate::errors::note_index_error::NoteIndexError;
use crate::structs::index_config::{EmbeddingBackend, EmbeddingConfig};

pub use self::fastembed::FastEmbedder;
pub use self::hashing::HashingEmbedder;
pub use self::ollama::OllamaEmbedder;

/// Boxed future returned by provider methods.
pub type EmbedFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, NoteIndexError>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in your own embedding backend (local model,
/// remote inference call). Vectors returned by one instance must all have the
/// same length.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds every text, returning one vector per input in input order.
    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>>;

    /// Embeds a single text.
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        Box::pin(async move {
            let batch = [text.to_string()];
            self.embed_batch(&batch)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| NoteIndexError::Embedding("empty embedding response".into()))
        })
    }

    /// Identifier of the underlying model.
    fn model_name(&self) -> &str;
}

/// Constructs the backend selected in `cfg`.
///
/// Loading a local model may download files and is done off the async workers.
///
/// # Errors
/// Returns [`NoteIndexError::Embedding`] when the model cannot be resolved or loaded.
pub async fn load_provider(
    cfg: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingsProvider>, NoteIndexError> {
    info!(
        target: "note_index::embedding",
        backend = ?cfg.backend,
        model = %cfg.model,
        "loading embedding provider"
    );

    let provider: Arc<dyn EmbeddingsProvider> = match cfg.backend {
        EmbeddingBackend::FastEmbed => {
            Arc::new(FastEmbedder::load(cfg.model.clone(), cfg.cache_dir.clone()).await?)
        }
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(
            &cfg.ollama_url,
            &cfg.model,
            cfg.timeout_secs,
        )?),
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(cfg.hashing_dim)),
    };

    Ok(provider)
}
