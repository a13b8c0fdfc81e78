//! Entry store contract.
//!
//! The store is the single source of truth for entries. Implementations
//! must serialize writes per entry and reject a replace whose version no
//! longer matches the stored one.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{NewToDoEntry, ToDoEntry};

/// Errors raised by an entry store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Entry {0} not found")]
    NotFound(Uuid),

    #[error("Entry {0} was modified concurrently")]
    Conflict(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence contract for ToDo entries.
#[async_trait::async_trait]
pub trait EntryStore: Send + Sync {
    /// Inserts a new entry. Assigns id, create time and version 1.
    async fn create(&self, entry: NewToDoEntry) -> Result<ToDoEntry, StoreError>;

    async fn get(&self, id: Uuid) -> Result<ToDoEntry, StoreError>;

    /// All entries ordered by create time.
    async fn list(&self) -> Result<Vec<ToDoEntry>, StoreError>;

    /// Replaces the mutable fields of an entry.
    ///
    /// Succeeds only when `entry.version` equals the stored version. The
    /// creator and create time are never overwritten.
    async fn replace(&self, id: Uuid, entry: &ToDoEntry) -> Result<ToDoEntry, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// In-process store used by tests and local runs without a database.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEntryStore {
    entries: Arc<RwLock<HashMap<Uuid, ToDoEntry>>>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn create(&self, entry: NewToDoEntry) -> Result<ToDoEntry, StoreError> {
        let now = Utc::now();
        let stored = ToDoEntry {
            id: Uuid::new_v4(),
            title: entry.title,
            description: entry.description,
            status: entry.status,
            pending_approval: entry.pending_approval,
            create_time: now,
            update_time: Some(now),
            approved_time: None,
            created_by: entry.created_by,
            updated_by: None,
            approved_by: None,
            version: 1,
        };

        self.entries.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<ToDoEntry, StoreError> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<ToDoEntry>, StoreError> {
        let mut entries: Vec<ToDoEntry> = self.entries.read().await.values().cloned().collect();
        entries.sort_by_key(|entry| entry.create_time);
        Ok(entries)
    }

    async fn replace(&self, id: Uuid, entry: &ToDoEntry) -> Result<ToDoEntry, StoreError> {
        let mut entries = self.entries.write().await;
        let current = entries.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if current.version != entry.version {
            return Err(StoreError::Conflict(id));
        }

        current.title = entry.title.clone();
        current.description = entry.description.clone();
        current.status = entry.status;
        current.pending_approval = entry.pending_approval;
        current.approved_time = entry.approved_time;
        current.updated_by = entry.updated_by;
        current.approved_by = entry.approved_by;
        current.update_time = Some(Utc::now());
        current.version += 1;

        Ok(current.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
