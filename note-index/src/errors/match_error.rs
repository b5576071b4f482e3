//! Per-query failures of the matcher.

use thiserror::Error;

/// Reasons a query cannot produce a match.
///
/// Each variant is an expected condition the caller reports back to the
/// client; none of them is substituted with a default result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The embedding provider failed to initialize or to embed the query.
    #[error("embedding model is unavailable{}", details_suffix(.details))]
    ModelUnavailable { details: Option<String> },

    /// The query is empty after trimming whitespace.
    #[error("query must not be empty")]
    EmptyQuery,

    /// The index holds no documents.
    #[error("no documents are indexed")]
    NoDocuments,
}

fn details_suffix(details: &Option<String>) -> String {
    match details {
        Some(d) if !d.is_empty() => format!(": {d}"),
        _ => String::new(),
    }
}
