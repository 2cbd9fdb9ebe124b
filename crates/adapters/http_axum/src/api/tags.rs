//! JSON REST handlers for search tags.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::id::TagId;
use casebook_domain::tag::Tag;

use super::{CreateResponse, DeleteResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// `GET /api/tags`
pub async fn list<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
) -> Result<ListResponse<Tag>, ApiError> {
    let tags = state.tags.list().await?;
    Ok(ListResponse::Ok(Json(tags)))
}

/// `POST /api/tags`
pub async fn create<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<CreateTagRequest>,
) -> Result<CreateResponse<Tag>, ApiError> {
    let tag = state.tags.insert(&req.name, &req.description).await?;
    Ok(CreateResponse::Created(Json(tag)))
}

/// `DELETE /api/tags/:id`
pub async fn delete<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: TagId = parse(&id, "tag_id")?;
    state.tags.delete(id).await?;
    Ok(DeleteResponse::NoContent)
}
