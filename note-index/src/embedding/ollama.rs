//! Ollama embedding backend.
//!
//! Calls `POST {endpoint}/api/embeddings` once per text with a shared
//! `reqwest::Client`.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EmbedFuture, EmbeddingsProvider};
use crate::errors::note_index_error::NoteIndexError;

#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

/// Remote embedding provider talking to an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaEmbedder {
    /// Builds the HTTP client; no request is made here.
    pub fn new(endpoint: &str, model: &str, timeout_secs: u64) -> Result<Self, NoteIndexError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| NoteIndexError::Embedding(format!("http client build: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}/api/embeddings", endpoint.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, NoteIndexError> {
        let req = OllamaEmbedRequest {
            model: &self.model,
            prompt: text,
        };

        debug!(target: "note_index::embedding", "POST {}", self.url);
        let resp = self
            .client
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|e| NoteIndexError::Embedding(format!("POST {}: {e}", self.url)))?;

        if resp.status() != StatusCode::OK {
            let code = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let snippet = body.chars().take(240).collect::<String>();
            return Err(NoteIndexError::Embedding(format!(
                "ollama embeddings non-200: {code}; body: {snippet}"
            )));
        }

        let parsed: OllamaEmbedResponse = resp
            .json()
            .await
            .map_err(|e| NoteIndexError::Embedding(format!("parse embeddings json: {e}")))?;

        if parsed.embedding.is_empty() {
            return Err(NoteIndexError::Embedding(format!(
                "ollama returned an empty embedding (model: {})",
                self.model
            )));
        }

        Ok(parsed.embedding)
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed_one(text).await?);
            }
            Ok(out)
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
