//! JSON REST handlers for the daily register and absence justifications.
//!
//! Register dates are `YYYY-MM-DD` path segments. Saving a register merges
//! it into what was recorded for that class and day, so unchanged records
//! keep their ids and justifications.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::attendance::{AttendanceRecord, DailyRegister, Justification, RegisterEntry};
use casebook_domain::id::{AttendanceRecordId, ClassId, StudentId};
use casebook_domain::time::{Date, today};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// Request body for saving a register. Students left out are present.
#[derive(Deserialize)]
pub struct SaveRegisterRequest {
    pub entries: Vec<RegisterEntry>,
}

#[derive(Deserialize)]
pub struct JustificationRequest {
    pub reason: String,
}

/// `GET /api/classes/:id/register/:date`
pub async fn get_register<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, date)): Path<(String, String)>,
) -> Result<GetResponse<DailyRegister>, ApiError> {
    let class: ClassId = parse(&id, "class_id")?;
    let date: Date = parse(&date, "date")?;
    let register = state.attendance.register_for(class, date).await?;
    Ok(GetResponse::Ok(Json(register)))
}

/// `PUT /api/classes/:id/register/:date`
pub async fn save_register<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, date)): Path<(String, String)>,
    Json(req): Json<SaveRegisterRequest>,
) -> Result<ListResponse<AttendanceRecord>, ApiError> {
    let register = DailyRegister {
        class_id: parse(&id, "class_id")?,
        date: parse(&date, "date")?,
        entries: req.entries,
    };
    let records = state.attendance.save_register(&register, today()).await?;
    Ok(ListResponse::Ok(Json(records)))
}

/// `GET /api/students/:id/attendance`
pub async fn student_records<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<AttendanceRecord>, ApiError> {
    let student: StudentId = parse(&id, "student_id")?;
    let records = state.attendance.student_records(student).await?;
    Ok(ListResponse::Ok(Json(records)))
}

/// `GET /api/students/:id/justifications`
pub async fn list_justifications<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Justification>, ApiError> {
    let student: StudentId = parse(&id, "student_id")?;
    let justifications = state.attendance.list_justifications(student).await?;
    Ok(ListResponse::Ok(Json(justifications)))
}

/// `POST /api/attendance/:record_id/justification`
pub async fn justify<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(record_id): Path<String>,
    Json(req): Json<JustificationRequest>,
) -> Result<CreateResponse<Justification>, ApiError> {
    let record: AttendanceRecordId = parse(&record_id, "record_id")?;
    let justification = state
        .attendance
        .justify(record, &req.reason, today())
        .await?;
    Ok(CreateResponse::Created(Json(justification)))
}

/// `PUT /api/attendance/:record_id/justification`
pub async fn edit_justification<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(record_id): Path<String>,
    Json(req): Json<JustificationRequest>,
) -> Result<GetResponse<Justification>, ApiError> {
    let record: AttendanceRecordId = parse(&record_id, "record_id")?;
    let justification = state
        .attendance
        .edit_justification(record, &req.reason)
        .await?;
    Ok(GetResponse::Ok(Json(justification)))
}

/// `DELETE /api/attendance/:record_id/justification`
pub async fn delete_justification<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(record_id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let record: AttendanceRecordId = parse(&record_id, "record_id")?;
    state.attendance.delete_justification(record).await?;
    Ok(DeleteResponse::NoContent)
}
