//! JSON REST handlers for teachings and study addresses.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::curriculum::{Address, Teaching};
use casebook_domain::id::{AddressId, TeachingId};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// Body shared by teaching and address creation and renaming.
#[derive(Deserialize)]
pub struct NameRequest {
    pub name: String,
}

/// `GET /api/teachings`
pub async fn list_teachings<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
) -> Result<ListResponse<Teaching>, ApiError> {
    let teachings = state.curriculum.list_teachings().await?;
    Ok(ListResponse::Ok(Json(teachings)))
}

/// `POST /api/teachings`
pub async fn create_teaching<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<NameRequest>,
) -> Result<CreateResponse<Teaching>, ApiError> {
    let teaching = state.curriculum.create_teaching(&req.name).await?;
    Ok(CreateResponse::Created(Json(teaching)))
}

/// `GET /api/teachings/:id`
pub async fn get_teaching<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<Teaching>, ApiError> {
    let id: TeachingId = parse(&id, "teaching_id")?;
    let teaching = state.curriculum.get_teaching(id).await?;
    Ok(GetResponse::Ok(Json(teaching)))
}

/// `PUT /api/teachings/:id`
pub async fn rename_teaching<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> Result<GetResponse<Teaching>, ApiError> {
    let id: TeachingId = parse(&id, "teaching_id")?;
    let teaching = state.curriculum.rename_teaching(id, &req.name).await?;
    Ok(GetResponse::Ok(Json(teaching)))
}

/// `DELETE /api/teachings/:id`
pub async fn delete_teaching<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: TeachingId = parse(&id, "teaching_id")?;
    state.curriculum.delete_teaching(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/addresses`
pub async fn list_addresses<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
) -> Result<ListResponse<Address>, ApiError> {
    let addresses = state.curriculum.list_addresses().await?;
    Ok(ListResponse::Ok(Json(addresses)))
}

/// `POST /api/addresses`
pub async fn create_address<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<NameRequest>,
) -> Result<CreateResponse<Address>, ApiError> {
    let address = state.curriculum.create_address(&req.name).await?;
    Ok(CreateResponse::Created(Json(address)))
}

/// `GET /api/addresses/:id`
pub async fn get_address<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<Address>, ApiError> {
    let id: AddressId = parse(&id, "address_id")?;
    let address = state.curriculum.get_address(id).await?;
    Ok(GetResponse::Ok(Json(address)))
}

/// `DELETE /api/addresses/:id`
pub async fn delete_address<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: AddressId = parse(&id, "address_id")?;
    state.curriculum.delete_address(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `PUT /api/addresses/:id/teachings/:teaching_id`
pub async fn assign_teaching<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, teaching)): Path<(String, String)>,
) -> Result<GetResponse<Address>, ApiError> {
    let id: AddressId = parse(&id, "address_id")?;
    let teaching: TeachingId = parse(&teaching, "teaching_id")?;
    let address = state.curriculum.assign_teaching(id, teaching).await?;
    Ok(GetResponse::Ok(Json(address)))
}

/// `DELETE /api/addresses/:id/teachings/:teaching_id`
pub async fn remove_teaching<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, teaching)): Path<(String, String)>,
) -> Result<GetResponse<Address>, ApiError> {
    let id: AddressId = parse(&id, "address_id")?;
    let teaching: TeachingId = parse(&teaching, "teaching_id")?;
    let address = state.curriculum.remove_teaching(id, teaching).await?;
    Ok(GetResponse::Ok(Json(address)))
}
