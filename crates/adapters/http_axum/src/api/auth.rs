//! Login endpoints.
//!
//! No session is created: a successful login answers with the account so
//! the caller can keep its identifier.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use casebook_app::ports::Store;
use casebook_domain::tourist::Tourist;
use casebook_domain::user::User;

use super::GetResponse;
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

#[derive(Deserialize)]
pub struct TouristLogin {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UserLogin {
    pub login: String,
    pub password: String,
}

/// `POST /api/auth/tourists`
pub async fn tourist_login<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<TouristLogin>,
) -> Result<GetResponse<Tourist>, ApiError> {
    let tourist = state.tourists.login(&req.username, &req.password).await?;
    Ok(GetResponse::Ok(Json(tourist)))
}

/// `POST /api/auth/users`
pub async fn user_login<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<UserLogin>,
) -> Result<GetResponse<User>, ApiError> {
    let user = state.users.login(&req.login, &req.password).await?;
    Ok(GetResponse::Ok(Json(user)))
}
