//! Domain models for the ToDo API.

pub mod identity;
pub mod todo_entry;

pub use identity::{Principal, Role};
pub use todo_entry::{
    ConfirmCompletionQuery, CreateToDoEntryRequest, NewToDoEntry, ToDoEntry, ToDoStatus,
    UpdateToDoEntryRequest,
};
