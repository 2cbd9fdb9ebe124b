//! JSON REST handlers for refreshment points and their banners.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::banner::{Banner, ImageUpload};
use casebook_domain::id::{BannerId, RefreshmentPointId};
use casebook_domain::refreshment_point::{PointDetails, RefreshmentPoint};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// Query parameters for `GET /api/refreshment-points`.
#[derive(Deserialize)]
pub struct ListParams {
    /// Substring of the name or address.
    pub q: Option<String>,
}

/// `GET /api/refreshment-points`
pub async fn list<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Query(params): Query<ListParams>,
) -> Result<ListResponse<RefreshmentPoint>, ApiError> {
    let points = match params.q {
        Some(q) => state.banners.search_points(&q).await?,
        None => state.banners.list_points().await?,
    };
    Ok(ListResponse::Ok(Json(points)))
}

/// `POST /api/refreshment-points`
pub async fn create<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(details): Json<PointDetails>,
) -> Result<CreateResponse<RefreshmentPoint>, ApiError> {
    let point = state.banners.create_point(details).await?;
    Ok(CreateResponse::Created(Json(point)))
}

/// `GET /api/refreshment-points/:id`
pub async fn get<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<RefreshmentPoint>, ApiError> {
    let id: RefreshmentPointId = parse(&id, "point_id")?;
    let point = state.banners.get_point(id).await?;
    Ok(GetResponse::Ok(Json(point)))
}

/// `PUT /api/refreshment-points/:id`
pub async fn update<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(details): Json<PointDetails>,
) -> Result<GetResponse<RefreshmentPoint>, ApiError> {
    let id: RefreshmentPointId = parse(&id, "point_id")?;
    let point = state.banners.update_point(id, &details).await?;
    Ok(GetResponse::Ok(Json(point)))
}

/// `DELETE /api/refreshment-points/:id`
pub async fn delete<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: RefreshmentPointId = parse(&id, "point_id")?;
    state.banners.delete_point(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/refreshment-points/:id/banners`
pub async fn list_banners<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Banner>, ApiError> {
    let id: RefreshmentPointId = parse(&id, "point_id")?;
    let banners = state.banners.list_banners(id).await?;
    Ok(ListResponse::Ok(Json(banners)))
}

/// `POST /api/refreshment-points/:id/banners`
pub async fn insert_banner<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(upload): Json<ImageUpload>,
) -> Result<CreateResponse<Banner>, ApiError> {
    let id: RefreshmentPointId = parse(&id, "point_id")?;
    let banner = state.banners.insert_banner(id, upload).await?;
    Ok(CreateResponse::Created(Json(banner)))
}

/// `PUT /api/banners/:id`
pub async fn replace_image<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(upload): Json<ImageUpload>,
) -> Result<GetResponse<Banner>, ApiError> {
    let id: BannerId = parse(&id, "banner_id")?;
    let banner = state.banners.replace_image(id, upload).await?;
    Ok(GetResponse::Ok(Json(banner)))
}

/// `DELETE /api/banners/:id`
pub async fn delete_banner<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: BannerId = parse(&id, "banner_id")?;
    state.banners.delete_banner(id).await?;
    Ok(DeleteResponse::NoContent)
}
