//! Axum route handlers for the SOW wizard sessions.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::extraction::UploadedFile;
use crate::models::form::FormEdit;
use crate::state::AppState;
use crate::workflow::controller::WorkflowController;
use crate::workflow::machine::WizardState;
use crate::workflow::views::{render_session, SessionView};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EditFormRequest {
    pub edits: Vec<FormEdit>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn session(state: &AppState, id: Uuid) -> Result<Arc<WorkflowController>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

fn view(controller: &WorkflowController, state: &WizardState) -> Json<SessionView> {
    Json(render_session(controller.id(), controller.created_at(), state))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let controller = state.sessions.create().await;
    let snapshot = controller.snapshot().await;
    (StatusCode::CREATED, view(&controller, &snapshot))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let controller = session(&state, id).await?;
    let snapshot = controller.snapshot().await;
    Ok(view(&controller, &snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/file
///
/// Expects a multipart body with a `file` part. The part's content type
/// decides whether the pick is accepted.
pub async fn handle_select_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let controller = session(&state, id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file part: {e}")))?;
        upload = Some(UploadedFile::new(file_name, content_type, bytes));
        break;
    }

    let file = upload
        .ok_or_else(|| AppError::Validation("Multipart body must contain a `file` part".into()))?;
    let snapshot = controller.select_file(file).await?;
    Ok(view(&controller, &snapshot))
}

/// DELETE /api/v1/sessions/:id/file
pub async fn handle_clear_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let controller = session(&state, id).await?;
    let snapshot = controller.clear_file().await?;
    Ok(view(&controller, &snapshot))
}

/// POST /api/v1/sessions/:id/extract
///
/// Upload → Form. Blocks until the extraction service answers or times out.
pub async fn handle_extract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let controller = session(&state, id).await?;
    let snapshot = controller.extract().await?;
    Ok(view(&controller, &snapshot))
}

/// PATCH /api/v1/sessions/:id/form
pub async fn handle_edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EditFormRequest>,
) -> Result<Json<SessionView>, AppError> {
    let controller = session(&state, id).await?;
    let snapshot = controller.edit(request.edits).await?;
    Ok(view(&controller, &snapshot))
}

/// POST /api/v1/sessions/:id/submit
///
/// Form → Recommendations. Validation failures come back as 422 without
/// contacting the recommendation service.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let controller = session(&state, id).await?;
    let snapshot = controller.submit().await?;
    Ok(view(&controller, &snapshot))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let controller = session(&state, id).await?;
    let snapshot = controller.reset().await;
    Ok(view(&controller, &snapshot))
}
