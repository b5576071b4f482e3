pub mod index_config;
pub mod note_entry;
