//! ToDo entry repository for database operations.

use domain::models::{NewToDoEntry, ToDoEntry};
use domain::services::{EntryStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ToDoEntryEntity, ToDoStatusDb};
use crate::metrics::QueryTimer;

const ENTRY_COLUMNS: &str = "id, title, description, status, pending_approval, create_time, \
     update_time, approved_time, created_by, updated_by, approved_by, version";

/// Repository for ToDo entries backed by PostgreSQL.
#[derive(Clone)]
pub struct ToDoEntryRepository {
    pool: PgPool,
}

impl ToDoEntryRepository {
    /// Creates a new ToDoEntryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an entry by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ToDoEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_todo_entry_by_id");
        let result = sqlx::query_as::<_, ToDoEntryEntity>(&format!(
            "SELECT {} FROM todo_entries WHERE id = $1",
            ENTRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    async fn exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("todo_entry_exists");
        let result: Result<(bool,), sqlx::Error> =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM todo_entries WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        Ok(result?.0)
    }
}

#[async_trait::async_trait]
impl EntryStore for ToDoEntryRepository {
    async fn create(&self, entry: NewToDoEntry) -> Result<ToDoEntry, StoreError> {
        let timer = QueryTimer::new("create_todo_entry");
        let result = sqlx::query_as::<_, ToDoEntryEntity>(&format!(
            r#"
            INSERT INTO todo_entries (title, description, status, pending_approval, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        ))
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(ToDoStatusDb::from(entry.status))
        .bind(entry.pending_approval)
        .bind(entry.created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    async fn get(&self, id: Uuid) -> Result<ToDoEntry, StoreError> {
        self.find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<ToDoEntry>, StoreError> {
        let timer = QueryTimer::new("list_todo_entries");
        let result = sqlx::query_as::<_, ToDoEntryEntity>(&format!(
            "SELECT {} FROM todo_entries ORDER BY create_time, id",
            ENTRY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Into::into).collect())
    }

    async fn replace(&self, id: Uuid, entry: &ToDoEntry) -> Result<ToDoEntry, StoreError> {
        let timer = QueryTimer::new("replace_todo_entry");
        let result = sqlx::query_as::<_, ToDoEntryEntity>(&format!(
            r#"
            UPDATE todo_entries
            SET title = $3,
                description = $4,
                status = $5,
                pending_approval = $6,
                approved_time = $7,
                updated_by = $8,
                approved_by = $9,
                update_time = NOW(),
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        ))
        .bind(id)
        .bind(entry.version)
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(ToDoStatusDb::from(entry.status))
        .bind(entry.pending_approval)
        .bind(entry.approved_time)
        .bind(entry.updated_by)
        .bind(entry.approved_by)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result? {
            Some(updated) => Ok(updated.into()),
            // No row matched: either the entry is gone or its version moved on.
            None if self.exists(id).await? => {
                tracing::debug!(
                    entry_id = %id,
                    expected_version = entry.version,
                    "Stale entry version"
                );
                Err(StoreError::Conflict(id))
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let timer = QueryTimer::new("delete_todo_entry");
        let result = sqlx::query("DELETE FROM todo_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();

        if result?.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
