/// One indexed file. Its embedding lives in the aligned row of [`crate::NoteIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    /// File name inside the notes folder; the external identifier.
    pub filename: String,

    /// Human-readable name derived from the file name, e.g. "Linear Algebra Notes".
    pub display_name: String,
}

/// Top-1 result of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteMatch {
    pub display_name: String,
    pub filename: String,

    /// Cosine similarity between the query and the entry name.
    pub score: f32,
}
