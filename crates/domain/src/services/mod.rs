//! Domain services.

pub mod approval;
pub mod entry_store;
pub mod identity;

pub use approval::{
    apply_confirmation, apply_update, plan_create, ApprovalWorkflow, WorkflowError,
};
pub use entry_store::{EntryStore, InMemoryEntryStore, StoreError};
pub use identity::{CredentialResolver, IdentityError, MockCredentialResolver};
