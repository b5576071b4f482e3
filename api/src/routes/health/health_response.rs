use serde::Serialize;

/// Body of GET /healthz.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Number of indexed documents.
    pub pdf_count: usize,
    /// Why the embedding model is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
