//! Approval workflow for ToDo entries.
//!
//! Completing an entry needs an administrator's sign-off. A caller who asks
//! for `Done` on an entry that was never approved gets `Doing` with the
//! pending-approval flag raised instead. An administrator then confirms or
//! rejects the completion.
//!
//! The transition rules live in pure functions so they can be exercised
//! without a store. [`ApprovalWorkflow`] sequences them against an
//! [`EntryStore`].

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::{
    CreateToDoEntryRequest, NewToDoEntry, Principal, ToDoEntry, ToDoStatus,
    UpdateToDoEntryRequest,
};
use crate::services::entry_store::{EntryStore, StoreError};

/// Errors surfaced by workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Entry {0} not found")]
    NotFound(Uuid),

    #[error("Entry {0} was modified by another request")]
    Conflict(Uuid),

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => WorkflowError::NotFound(id),
            StoreError::Conflict(id) => WorkflowError::Conflict(id),
            other => WorkflowError::Store(other),
        }
    }
}

/// Builds the entry to insert for a create request.
///
/// A request for `Done` is stored as `Doing` awaiting approval.
pub fn plan_create(request: CreateToDoEntryRequest, actor: &Principal) -> NewToDoEntry {
    let (status, pending_approval) = match request.status {
        ToDoStatus::Done => (ToDoStatus::Doing, Some(true)),
        status => (status, None),
    };

    NewToDoEntry {
        title: request.title,
        description: request.description,
        status,
        pending_approval,
        created_by: actor.user_id,
    }
}

/// Merges a sparse patch into a stored entry.
///
/// Only fields present in the patch change. `Done` on an unapproved entry
/// becomes `Doing` with approval pending. Creator and create time always
/// carry over, and the returned entry keeps the stored version so the
/// store can detect a concurrent write.
pub fn apply_update(
    stored: &ToDoEntry,
    patch: UpdateToDoEntryRequest,
    actor: &Principal,
) -> ToDoEntry {
    let mut next = stored.clone();

    if let Some(title) = patch.title {
        next.title = title;
    }
    if let Some(description) = patch.description {
        next.description = description;
    }

    match patch.status {
        Some(ToDoStatus::Done) if !stored.is_approved() => {
            debug!(
                entry_id = %stored.id,
                "Done requested on unapproved entry, marking pending approval"
            );
            next.status = ToDoStatus::Doing;
            next.pending_approval = Some(true);
        }
        Some(status) => next.status = status,
        None => {}
    }

    next.updated_by = Some(actor.user_id);
    next
}

/// Applies an administrator's decision on a completion.
///
/// Confirming stamps the approval and moves the entry to `Done`. Rejecting
/// only clears the pending flag. Either way the pending flag ends `false`.
pub fn apply_confirmation(
    stored: &ToDoEntry,
    confirm: bool,
    actor: &Principal,
    now: DateTime<Utc>,
) -> ToDoEntry {
    let mut next = stored.clone();

    if confirm {
        next.approved_time = Some(now);
        next.approved_by = Some(actor.user_id);
        next.status = ToDoStatus::Done;
    }

    next.pending_approval = Some(false);
    next.updated_by = Some(actor.user_id);
    next
}

fn check_version(stored: &ToDoEntry, expected: Option<i64>) -> Result<(), WorkflowError> {
    match expected {
        Some(version) if version != stored.version => Err(WorkflowError::Conflict(stored.id)),
        _ => Ok(()),
    }
}

/// Entry operations bound to a store.
pub struct ApprovalWorkflow<S> {
    store: S,
}

impl<S: EntryStore> ApprovalWorkflow<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<ToDoEntry>, WorkflowError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<ToDoEntry, WorkflowError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn create(
        &self,
        request: CreateToDoEntryRequest,
        actor: &Principal,
    ) -> Result<ToDoEntry, WorkflowError> {
        request.validate()?;

        let planned = plan_create(request, actor);
        let entry = self.store.create(planned).await?;

        if entry.is_pending_approval() {
            debug!(entry_id = %entry.id, "Entry created awaiting completion approval");
        }
        Ok(entry)
    }

    /// Applies a sparse update. Fails with `Conflict` when the patch carries
    /// a stale version or another write lands first.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateToDoEntryRequest,
        actor: &Principal,
    ) -> Result<ToDoEntry, WorkflowError> {
        patch.validate()?;

        let stored = self.store.get(id).await?;
        check_version(&stored, patch.version)?;

        let next = apply_update(&stored, patch, actor);
        Ok(self.store.replace(id, &next).await?)
    }

    /// Records an administrator's decision on an entry's completion.
    pub async fn confirm_completion(
        &self,
        id: Uuid,
        confirm: bool,
        expected_version: Option<i64>,
        actor: &Principal,
    ) -> Result<ToDoEntry, WorkflowError> {
        if !actor.is_admin() {
            return Err(WorkflowError::Forbidden(
                "Admin role required to confirm completion".to_string(),
            ));
        }

        let stored = self.store.get(id).await?;
        check_version(&stored, expected_version)?;

        let next = apply_confirmation(&stored, confirm, actor, Utc::now());
        Ok(self.store.replace(id, &next).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), WorkflowError> {
        Ok(self.store.delete(id).await?)
    }
}
