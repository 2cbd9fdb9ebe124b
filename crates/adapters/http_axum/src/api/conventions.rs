//! JSON REST handlers for conventions between refreshment points and
//! agencies.

use axum::Json;
use axum::extract::{Path, State};

use casebook_app::ports::Store;
use casebook_domain::convention::{Convention, ConventionRequest};
use casebook_domain::id::{ConventionId, RefreshmentPointId};
use casebook_domain::time::today;

use super::{CreateResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// `GET /api/refreshment-points/:id/conventions`
pub async fn history<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Convention>, ApiError> {
    let point: RefreshmentPointId = parse(&id, "point_id")?;
    let conventions = state.conventions.history(point).await?;
    Ok(ListResponse::Ok(Json(conventions)))
}

/// `POST /api/refreshment-points/:id/conventions`
pub async fn request<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(req): Json<ConventionRequest>,
) -> Result<CreateResponse<Convention>, ApiError> {
    let point: RefreshmentPointId = parse(&id, "point_id")?;
    let convention = state.conventions.request(point, &req, today()).await?;
    Ok(CreateResponse::Created(Json(convention)))
}

/// `GET /api/conventions/:id`
pub async fn get<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<Convention>, ApiError> {
    let id: ConventionId = parse(&id, "convention_id")?;
    let convention = state.conventions.get(id).await?;
    Ok(GetResponse::Ok(Json(convention)))
}

/// `POST /api/conventions/:id/activate`
pub async fn activate<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<Convention>, ApiError> {
    let id: ConventionId = parse(&id, "convention_id")?;
    let convention = state.conventions.activate(id, today()).await?;
    Ok(GetResponse::Ok(Json(convention)))
}
