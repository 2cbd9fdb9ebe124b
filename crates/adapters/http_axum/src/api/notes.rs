//! JSON REST handlers for disciplinary notes.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::id::{NoteId, StudentId};
use casebook_domain::note::{Note, NoteForm};
use casebook_domain::time::{Date, today};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

#[derive(Deserialize)]
pub struct NoteRequest {
    pub teacher_id: String,
    pub date: Date,
    pub description: String,
}

#[derive(Deserialize)]
pub struct EditNoteRequest {
    pub description: String,
}

/// `GET /api/students/:id/notes`
pub async fn list<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Note>, ApiError> {
    let student: StudentId = parse(&id, "student_id")?;
    let notes = state.notes.list_for_student(student).await?;
    Ok(ListResponse::Ok(Json(notes)))
}

/// `POST /api/students/:id/notes`
pub async fn insert<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(req): Json<NoteRequest>,
) -> Result<CreateResponse<Note>, ApiError> {
    let student: StudentId = parse(&id, "student_id")?;
    let form = NoteForm {
        teacher_id: parse(&req.teacher_id, "teacher_id")?,
        date: req.date,
        description: req.description,
    };
    let note = state.notes.insert(student, &form, today()).await?;
    Ok(CreateResponse::Created(Json(note)))
}

/// `GET /api/notes/:id`
pub async fn get<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<Note>, ApiError> {
    let id: NoteId = parse(&id, "note_id")?;
    let note = state.notes.get(id).await?;
    Ok(GetResponse::Ok(Json(note)))
}

/// `PUT /api/notes/:id`
pub async fn edit<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(req): Json<EditNoteRequest>,
) -> Result<GetResponse<Note>, ApiError> {
    let id: NoteId = parse(&id, "note_id")?;
    let note = state.notes.edit(id, &req.description).await?;
    Ok(GetResponse::Ok(Json(note)))
}

/// `DELETE /api/notes/:id`
pub async fn delete<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: NoteId = parse(&id, "note_id")?;
    state.notes.delete(id).await?;
    Ok(DeleteResponse::NoContent)
}
