//! ToDo entry entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ToDoEntry, ToDoStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for todo_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "todo_status", rename_all = "lowercase")]
pub enum ToDoStatusDb {
    ToDo,
    Doing,
    Done,
}

impl From<ToDoStatusDb> for ToDoStatus {
    fn from(db_status: ToDoStatusDb) -> Self {
        match db_status {
            ToDoStatusDb::ToDo => ToDoStatus::ToDo,
            ToDoStatusDb::Doing => ToDoStatus::Doing,
            ToDoStatusDb::Done => ToDoStatus::Done,
        }
    }
}

impl From<ToDoStatus> for ToDoStatusDb {
    fn from(status: ToDoStatus) -> Self {
        match status {
            ToDoStatus::ToDo => ToDoStatusDb::ToDo,
            ToDoStatus::Doing => ToDoStatusDb::Doing,
            ToDoStatus::Done => ToDoStatusDb::Done,
        }
    }
}

/// Database row mapping for the todo_entries table.
#[derive(Debug, Clone, FromRow)]
pub struct ToDoEntryEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ToDoStatusDb,
    pub pending_approval: Option<bool>,
    pub create_time: DateTime<Utc>,
    pub update_time: Option<DateTime<Utc>>,
    pub approved_time: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub version: i64,
}

impl From<ToDoEntryEntity> for ToDoEntry {
    fn from(entity: ToDoEntryEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            status: entity.status.into(),
            pending_approval: entity.pending_approval,
            create_time: entity.create_time,
            update_time: entity.update_time,
            approved_time: entity.approved_time,
            created_by: entity.created_by,
            updated_by: entity.updated_by,
            approved_by: entity.approved_by,
            version: entity.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::{Sentence, Word};
    use fake::Fake;

    #[test]
    fn test_status_conversion_both_ways() {
        for status in [ToDoStatus::ToDo, ToDoStatus::Doing, ToDoStatus::Done] {
            let db: ToDoStatusDb = status.into();
            assert_eq!(ToDoStatus::from(db), status);
        }
    }

    #[test]
    fn test_entity_into_domain() {
        let entity = ToDoEntryEntity {
            id: Uuid::new_v4(),
            title: Word().fake(),
            description: Sentence(3..8).fake(),
            status: ToDoStatusDb::Doing,
            pending_approval: Some(true),
            create_time: Utc::now(),
            update_time: None,
            approved_time: None,
            created_by: Uuid::new_v4(),
            updated_by: None,
            approved_by: None,
            version: 3,
        };

        let entry: ToDoEntry = entity.clone().into();
        assert_eq!(entry.id, entity.id);
        assert_eq!(entry.title, entity.title);
        assert_eq!(entry.description, entity.description);
        assert_eq!(entry.status, ToDoStatus::Doing);
        assert!(entry.is_pending_approval());
        assert_eq!(entry.version, 3);
    }
}
