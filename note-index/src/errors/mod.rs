pub mod match_error;
pub mod note_index_error;
