//! JSON REST handlers for tourist accounts, their preferred sites and their
//! search preferences.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::id::{SiteId, TagId, TouristId};
use casebook_domain::site::Site;
use casebook_domain::tourist::{
    PasswordChange, ProfileUpdate, RegistrationForm, SearchPreferences, Tourist,
};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// Query string of the list endpoint.
#[derive(Deserialize)]
pub struct ListParams {
    /// Substring of the username or full name.
    pub q: Option<String>,
}

/// Request body replacing the search preferences.
#[derive(Deserialize)]
pub struct SearchPreferencesRequest {
    pub tags: Vec<String>,
}

/// Request body for bookmarking a site.
#[derive(Deserialize)]
pub struct PreferredSiteRequest {
    pub site_id: String,
}

/// `GET /api/tourists?q=`
pub async fn list<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Query(params): Query<ListParams>,
) -> Result<ListResponse<Tourist>, ApiError> {
    let tourists = match params.q {
        Some(q) => state.tourists.search(&q).await?,
        None => state.tourists.list().await?,
    };
    Ok(ListResponse::Ok(Json(tourists)))
}

/// `POST /api/tourists`
pub async fn register<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(form): Json<RegistrationForm>,
) -> Result<CreateResponse<Tourist>, ApiError> {
    let tourist = state.tourists.register(&form).await?;
    Ok(CreateResponse::Created(Json(tourist)))
}

/// `GET /api/tourists/:id`
pub async fn get<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<Tourist>, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    let tourist = state.tourists.get(id).await?;
    Ok(GetResponse::Ok(Json(tourist)))
}

/// `PUT /api/tourists/:id`
pub async fn update_profile<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<GetResponse<Tourist>, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    let tourist = state.tourists.update_profile(id, &update).await?;
    Ok(GetResponse::Ok(Json(tourist)))
}

/// `PUT /api/tourists/:id/password`
pub async fn change_password<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(change): Json<PasswordChange>,
) -> Result<DeleteResponse, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    state.tourists.change_password(id, &change).await?;
    Ok(DeleteResponse::NoContent)
}

/// `DELETE /api/tourists/:id`
pub async fn delete<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    state.tourists.delete(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/tourists/:id/preferred-sites`
pub async fn preferred_sites<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Site>, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    let sites = state.tourists.preferred_sites(id).await?;
    Ok(ListResponse::Ok(Json(sites)))
}

/// `POST /api/tourists/:id/preferred-sites`
pub async fn add_preferred_site<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(req): Json<PreferredSiteRequest>,
) -> Result<DeleteResponse, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    let site: SiteId = parse(&req.site_id, "site_id")?;
    state.tourists.add_preferred_site(id, site).await?;
    Ok(DeleteResponse::NoContent)
}

/// `DELETE /api/tourists/:id/preferred-sites/:site_id`
pub async fn remove_preferred_site<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, site_id)): Path<(String, String)>,
) -> Result<DeleteResponse, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    let site: SiteId = parse(&site_id, "site_id")?;
    state.tourists.remove_preferred_site(id, site).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/tourists/:id/search-preferences`
pub async fn search_preferences<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<SearchPreferences>, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    let preferences = state.tourists.search_preferences(id).await?;
    Ok(GetResponse::Ok(Json(preferences)))
}

/// `PUT /api/tourists/:id/search-preferences`
pub async fn set_search_preferences<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(req): Json<SearchPreferencesRequest>,
) -> Result<GetResponse<SearchPreferences>, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    let tags = req
        .tags
        .iter()
        .map(|raw| parse::<TagId>(raw, "tag_id"))
        .collect::<Result<_, _>>()?;
    let preferences = state.tourists.set_search_preferences(id, tags).await?;
    Ok(GetResponse::Ok(Json(preferences)))
}

/// `GET /api/tourists/:id/suggested-sites`
pub async fn suggested_sites<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Site>, ApiError> {
    let id: TouristId = parse(&id, "tourist_id")?;
    let sites = state.tourists.suggested_sites(id).await?;
    Ok(ListResponse::Ok(Json(sites)))
}
