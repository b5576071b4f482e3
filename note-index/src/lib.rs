//! Public API:
//! - `build_index`: scan a notes folder, derive display names, embed them.
//! - `match_query`: embed a query and return the top-1 entry by cosine similarity.
//! - `SearchState`: the once-at-startup lifecycle (`Ready` or `Degraded`) shared by handlers.

pub mod embedding;
pub mod errors;
mod note_index;
pub mod scan;
pub mod similarity;
mod state;
pub mod structs;
pub mod telemetry;

pub use embedding::{EmbeddingsProvider, load_provider};
pub use errors::match_error::MatchError;
pub use errors::note_index_error::NoteIndexError;
pub use note_index::{NoteIndex, build_index};
pub use state::{SearchState, match_query};
pub use structs::index_config::{EmbeddingBackend, EmbeddingConfig, IndexConfig};
pub use structs::note_entry::{NoteEntry, NoteMatch};
