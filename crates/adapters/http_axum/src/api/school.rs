//! JSON REST handlers for academic years, classes and students.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::academic_year::AcademicYear;
use casebook_domain::id::{AcademicYearId, ClassId, StudentId};
use casebook_domain::school_class::SchoolClass;
use casebook_domain::student::{Enrollment, Student};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

#[derive(Deserialize)]
pub struct CreateYearRequest {
    /// Calendar year the academic year starts in, e.g. 2024 for 2024/2025.
    pub start_year: i32,
}

#[derive(Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
}

/// `GET /api/academic-years`
pub async fn list_years<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
) -> Result<ListResponse<AcademicYear>, ApiError> {
    let years = state.school.list_academic_years().await?;
    Ok(ListResponse::Ok(Json(years)))
}

/// `POST /api/academic-years`
pub async fn create_year<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<CreateYearRequest>,
) -> Result<CreateResponse<AcademicYear>, ApiError> {
    let year = state.school.create_academic_year(req.start_year).await?;
    Ok(CreateResponse::Created(Json(year)))
}

/// `GET /api/academic-years/:id/classes`
pub async fn list_classes<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<SchoolClass>, ApiError> {
    let year: AcademicYearId = parse(&id, "academic_year_id")?;
    let classes = state.school.list_classes(year).await?;
    Ok(ListResponse::Ok(Json(classes)))
}

/// `POST /api/academic-years/:id/classes`
pub async fn create_class<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(req): Json<CreateClassRequest>,
) -> Result<CreateResponse<SchoolClass>, ApiError> {
    let year: AcademicYearId = parse(&id, "academic_year_id")?;
    let class = state.school.create_class(year, &req.name).await?;
    Ok(CreateResponse::Created(Json(class)))
}

/// `GET /api/classes/:id`
pub async fn get_class<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<SchoolClass>, ApiError> {
    let id: ClassId = parse(&id, "class_id")?;
    let class = state.school.get_class(id).await?;
    Ok(GetResponse::Ok(Json(class)))
}

/// `DELETE /api/classes/:id`
pub async fn delete_class<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: ClassId = parse(&id, "class_id")?;
    state.school.delete_class(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/classes/:id/students`
pub async fn list_students<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Student>, ApiError> {
    let class: ClassId = parse(&id, "class_id")?;
    let students = state.school.list_students(class).await?;
    Ok(ListResponse::Ok(Json(students)))
}

/// `POST /api/classes/:id/students`
pub async fn enroll_student<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(enrollment): Json<Enrollment>,
) -> Result<CreateResponse<Student>, ApiError> {
    let class: ClassId = parse(&id, "class_id")?;
    let student = state.school.enroll_student(class, &enrollment).await?;
    Ok(CreateResponse::Created(Json(student)))
}

/// `GET /api/students/:id`
pub async fn get_student<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<Student>, ApiError> {
    let id: StudentId = parse(&id, "student_id")?;
    let student = state.school.get_student(id).await?;
    Ok(GetResponse::Ok(Json(student)))
}
