pub mod frontend;
pub mod health;
pub mod notes;
pub mod search;
