//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod todo_entry;
pub mod user;

pub use todo_entry::{ToDoEntryEntity, ToDoStatusDb};
pub use user::UserEntity;
