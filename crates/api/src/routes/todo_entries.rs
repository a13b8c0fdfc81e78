//! ToDo entry endpoint handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::models::{
    ConfirmCompletionQuery, CreateToDoEntryRequest, ToDoEntry, UpdateToDoEntryRequest,
};
use domain::services::ApprovalWorkflow;
use persistence::repositories::ToDoEntryRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_completion_decision, record_entry_created};

fn workflow(state: &AppState) -> ApprovalWorkflow<ToDoEntryRepository> {
    ApprovalWorkflow::new(ToDoEntryRepository::new(state.pool.clone()))
}

/// List all entries ordered by create time.
///
/// GET /api/v1/entries
pub async fn list_entries(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<Json<Vec<ToDoEntry>>, ApiError> {
    let entries = workflow(&state).list().await?;
    Ok(Json(entries))
}

/// Get a single entry.
///
/// GET /api/v1/entries/:id
pub async fn get_entry(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ToDoEntry>, ApiError> {
    let entry = workflow(&state).get(id).await?;
    Ok(Json(entry))
}

/// Create an entry. A requested `Done` is stored as `Doing` pending approval.
///
/// POST /api/v1/entries
pub async fn create_entry(
    State(state): State<AppState>,
    auth: UserAuth,
    payload: Result<Json<CreateToDoEntryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let entry = workflow(&state).create(request, auth.principal()).await?;

    record_entry_created(entry.is_pending_approval());
    info!(
        entry_id = %entry.id,
        user_id = %auth.user_id(),
        status = %entry.status,
        "Entry created"
    );

    let location = format!("/api/v1/entries/{}", entry.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(entry),
    )
        .into_response())
}

/// Apply a sparse update.
///
/// PUT /api/v1/entries/:id
pub async fn update_entry(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateToDoEntryRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(patch) = payload?;
    let entry = workflow(&state)
        .update(id, patch, auth.principal())
        .await?;

    info!(
        entry_id = %entry.id,
        user_id = %auth.user_id(),
        status = %entry.status,
        pending_approval = entry.is_pending_approval(),
        version = entry.version,
        "Entry updated"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Confirm or reject a completion. Admin only.
///
/// PUT /api/v1/entries/:id/confirm?confirm=true|false
pub async fn confirm_entry(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    query: Result<Query<ConfirmCompletionQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query?;
    let entry = workflow(&state)
        .confirm_completion(id, query.confirm, query.version, auth.principal())
        .await?;

    record_completion_decision(query.confirm);
    info!(
        entry_id = %entry.id,
        admin_id = %auth.user_id(),
        confirmed = query.confirm,
        status = %entry.status,
        "Completion decision recorded"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Delete an entry.
///
/// DELETE /api/v1/entries/:id
pub async fn delete_entry(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    workflow(&state).delete(id).await?;

    info!(entry_id = %id, user_id = %auth.user_id(), "Entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
