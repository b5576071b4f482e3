use serde::Deserialize;

/// Request payload for POST /api/search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    /// Free-text query; missing or null counts as empty.
    #[serde(default)]
    pub query: Option<String>,
}
