//! Repository implementations for database operations.

pub mod todo_entry;
pub mod user;

pub use todo_entry::ToDoEntryRepository;
pub use user::UserRepository;
