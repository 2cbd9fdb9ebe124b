//! JSON REST handlers for site feedback and ratings.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::feedback::{Feedback, SiteRating, Vote};
use casebook_domain::id::{FeedbackId, SiteId, TouristId};

use super::{CreateResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// Request body for releasing a feedback.
#[derive(Deserialize)]
pub struct InsertFeedbackRequest {
    pub tourist_id: String,
    /// Any JSON integer; values outside 1..=5 are a validation error.
    pub vote: i64,
    #[serde(default)]
    pub comment: String,
}

/// Request body for editing a comment. The author must match.
#[derive(Deserialize)]
pub struct ModifyCommentRequest {
    pub tourist_id: String,
    pub comment: String,
}

/// `GET /api/sites/:id/feedback`
pub async fn list_for_site<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Feedback>, ApiError> {
    let site: SiteId = parse(&id, "site_id")?;
    let feedback = state.feedback.list_for_site(site).await?;
    Ok(ListResponse::Ok(Json(feedback)))
}

/// `GET /api/tourists/:id/feedback`
pub async fn list_for_tourist<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Feedback>, ApiError> {
    let tourist: TouristId = parse(&id, "tourist_id")?;
    let feedback = state.feedback.list_for_tourist(tourist).await?;
    Ok(ListResponse::Ok(Json(feedback)))
}

/// `POST /api/sites/:id/feedback`
pub async fn insert<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(req): Json<InsertFeedbackRequest>,
) -> Result<CreateResponse<Feedback>, ApiError> {
    let site: SiteId = parse(&id, "site_id")?;
    let tourist: TouristId = parse(&req.tourist_id, "tourist_id")?;
    let vote = Vote::try_from(req.vote)?;
    let feedback = state
        .feedback
        .insert(tourist, site, vote, &req.comment)
        .await?;
    Ok(CreateResponse::Created(Json(feedback)))
}

/// `PUT /api/feedback/:id/comment`
pub async fn modify_comment<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
    Json(req): Json<ModifyCommentRequest>,
) -> Result<GetResponse<Feedback>, ApiError> {
    let id: FeedbackId = parse(&id, "feedback_id")?;
    let author: TouristId = parse(&req.tourist_id, "tourist_id")?;
    let feedback = state
        .feedback
        .modify_comment(id, author, &req.comment)
        .await?;
    Ok(GetResponse::Ok(Json(feedback)))
}

/// `GET /api/sites/:id/rating`
pub async fn rating<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<SiteRating>, ApiError> {
    let site: SiteId = parse(&id, "site_id")?;
    let rating = state.feedback.site_rating(site).await?;
    Ok(GetResponse::Ok(Json(rating)))
}
