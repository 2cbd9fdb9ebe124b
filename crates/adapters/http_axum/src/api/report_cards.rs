//! JSON REST handlers for report cards.

use axum::Json;
use axum::extract::{Path, State};

use casebook_app::ports::Store;
use casebook_domain::id::{AcademicYearId, StudentId};
use casebook_domain::report_card::{ReportCard, ReportCardForm, Term};

use super::{CreateResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// `GET /api/students/:id/report-cards`
pub async fn list<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<ReportCard>, ApiError> {
    let student: StudentId = parse(&id, "student_id")?;
    let cards = state.report_cards.list_for_student(student).await?;
    Ok(ListResponse::Ok(Json(cards)))
}

/// `POST /api/students/:id/report-cards`
///
/// Publishing again for the same year and term replaces the earlier card.
pub async fn publish<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(form): Json<ReportCardForm>,
) -> Result<CreateResponse<ReportCard>, ApiError> {
    let student: StudentId = parse(&id, "student_id")?;
    let card = state.report_cards.publish(student, &form).await?;
    Ok(CreateResponse::Created(Json(card)))
}

/// `GET /api/students/:id/report-cards/:year_id/:term`
pub async fn get<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, year_id, term)): Path<(String, String, String)>,
) -> Result<GetResponse<ReportCard>, ApiError> {
    let student: StudentId = parse(&id, "student_id")?;
    let year: AcademicYearId = parse(&year_id, "academic_year_id")?;
    let term: Term = parse(&term, "term")?;
    let card = state.report_cards.get(student, year, term).await?;
    Ok(GetResponse::Ok(Json(card)))
}
