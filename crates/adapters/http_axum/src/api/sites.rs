//! JSON REST handlers for cultural heritage sites.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::id::{SiteId, TagId};
use casebook_domain::site::{Site, SiteDetails, SiteQuery};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// Query string of the search endpoint.
#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub tag: Option<String>,
}

/// `GET /api/sites?q=&tag=`
pub async fn search<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Query(params): Query<SearchParams>,
) -> Result<ListResponse<Site>, ApiError> {
    let tag = params
        .tag
        .as_deref()
        .map(|raw| parse::<TagId>(raw, "tag"))
        .transpose()?;
    let query = SiteQuery {
        keyword: params.q,
        tag,
    };
    let sites = state.sites.search(&query).await?;
    Ok(ListResponse::Ok(Json(sites)))
}

/// `POST /api/sites`
pub async fn create<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(details): Json<SiteDetails>,
) -> Result<CreateResponse<Site>, ApiError> {
    let site = state.sites.create(details).await?;
    Ok(CreateResponse::Created(Json(site)))
}

/// `GET /api/sites/:id`
pub async fn get<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<Site>, ApiError> {
    let id: SiteId = parse(&id, "site_id")?;
    let site = state.sites.get(id).await?;
    Ok(GetResponse::Ok(Json(site)))
}

/// `PUT /api/sites/:id`
pub async fn update<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(details): Json<SiteDetails>,
) -> Result<GetResponse<Site>, ApiError> {
    let id: SiteId = parse(&id, "site_id")?;
    let site = state.sites.update(id, &details).await?;
    Ok(GetResponse::Ok(Json(site)))
}

/// `DELETE /api/sites/:id`
pub async fn delete<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: SiteId = parse(&id, "site_id")?;
    state.sites.delete(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `PUT /api/sites/:id/tags/:tag_id`
pub async fn tag<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, tag_id)): Path<(String, String)>,
) -> Result<GetResponse<Site>, ApiError> {
    let id: SiteId = parse(&id, "site_id")?;
    let tag: TagId = parse(&tag_id, "tag_id")?;
    let site = state.sites.tag_site(id, tag).await?;
    Ok(GetResponse::Ok(Json(site)))
}

/// `DELETE /api/sites/:id/tags/:tag_id`
pub async fn untag<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, tag_id)): Path<(String, String)>,
) -> Result<GetResponse<Site>, ApiError> {
    let id: SiteId = parse(&id, "site_id")?;
    let tag: TagId = parse(&tag_id, "tag_id")?;
    let site = state.sites.untag_site(id, tag).await?;
    Ok(GetResponse::Ok(Json(site)))
}
