//! Notes CRUD handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::dto::MessageResponse;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ServerError};
use crate::model::{Note, NoteInput};

/// `GET /notes`: Every note.
#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "Notes",
    summary = "List notes",
    responses(
        (status = 200, description = "Notes, most recently updated first", body = Vec<Note>),
    )
)]
pub async fn list_notes(State(state): State<AppState>) -> Json<Vec<Note>> {
    Json(state.notes.list().await)
}

/// `POST /notes`: Create a note.
#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "Notes",
    summary = "Create a note",
    request_body = NoteInput,
    responses(
        (status = 201, description = "Note created", body = Note),
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    Json(input): Json<NoteInput>,
) -> impl IntoResponse {
    (StatusCode::CREATED, Json(state.notes.create(input).await))
}

/// `PUT /notes/{id}`: Replace a note's title and content.
///
/// # Errors
///
/// Returns [`ServerError`] for blank fields or an unknown note.
#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    tag = "Notes",
    summary = "Update a note",
    params(
        ("id" = String, Path, description = "Note ID"),
    ),
    request_body = NoteInput,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 400, description = "Blank title or content", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    Json(input): Json<NoteInput>,
) -> Result<Json<Note>, ServerError> {
    Ok(Json(state.notes.update(&note_id, input).await?))
}

/// `DELETE /notes/{id}`: Delete a note.
///
/// # Errors
///
/// Returns [`ServerError::NoteNotFound`] for an unknown note.
#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    tag = "Notes",
    summary = "Delete a note",
    params(
        ("id" = String, Path, description = "Note ID"),
    ),
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    state.notes.delete(&note_id).await?;
    Ok(Json(MessageResponse {
        message: "Note deleted".to_string(),
    }))
}

/// Note routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", put(update_note).delete(delete_note))
}
