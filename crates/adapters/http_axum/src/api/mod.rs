//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod attendance;
#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod conventions;
#[allow(clippy::missing_errors_doc)]
pub mod curriculum;
#[allow(clippy::missing_errors_doc)]
pub mod feedback;
#[allow(clippy::missing_errors_doc)]
pub mod notes;
#[allow(clippy::missing_errors_doc)]
pub mod points;
#[allow(clippy::missing_errors_doc)]
pub mod report_cards;
#[allow(clippy::missing_errors_doc)]
pub mod school;
#[allow(clippy::missing_errors_doc)]
pub mod sites;
#[allow(clippy::missing_errors_doc)]
pub mod tags;
#[allow(clippy::missing_errors_doc)]
pub mod tourists;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use std::str::FromStr;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use serde::Serialize;

use casebook_app::ports::Store;

use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// Possible responses from a list endpoint.
pub enum ListResponse<T> {
    Ok(Json<Vec<T>>),
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from an endpoint returning a single resource.
pub enum GetResponse<T> {
    Ok(Json<T>),
}

impl<T: Serialize> IntoResponse for GetResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from a create endpoint.
pub enum CreateResponse<T> {
    Created(Json<T>),
}

impl<T: Serialize> IntoResponse for CreateResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from endpoints that return no body.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Parse a path or body identifier, answering 400 when it is malformed.
pub(crate) fn parse<T: FromStr>(raw: &str, field: &'static str) -> Result<T, ApiError> {
    T::from_str(raw).map_err(|_| ApiError::malformed(field))
}

/// Build the `/api` sub-router.
#[allow(clippy::too_many_lines)]
pub fn routes<S: Store, P: Publisher>() -> Router<AppState<S, P>> {
    Router::new()
        // Tourists
        .route(
            "/tourists",
            get(tourists::list::<S, P>).post(tourists::register::<S, P>),
        )
        .route(
            "/tourists/{id}",
            get(tourists::get::<S, P>)
                .put(tourists::update_profile::<S, P>)
                .delete(tourists::delete::<S, P>),
        )
        .route(
            "/tourists/{id}/password",
            put(tourists::change_password::<S, P>),
        )
        .route(
            "/tourists/{id}/preferred-sites",
            get(tourists::preferred_sites::<S, P>).post(tourists::add_preferred_site::<S, P>),
        )
        .route(
            "/tourists/{id}/preferred-sites/{site_id}",
            delete(tourists::remove_preferred_site::<S, P>),
        )
        .route(
            "/tourists/{id}/feedback",
            get(feedback::list_for_tourist::<S, P>),
        )
        .route(
            "/tourists/{id}/search-preferences",
            get(tourists::search_preferences::<S, P>).put(tourists::set_search_preferences::<S, P>),
        )
        .route(
            "/tourists/{id}/suggested-sites",
            get(tourists::suggested_sites::<S, P>),
        )
        // Authentication
        .route("/auth/tourists", post(auth::tourist_login::<S, P>))
        .route("/auth/users", post(auth::user_login::<S, P>))
        // Sites
        .route(
            "/sites",
            get(sites::search::<S, P>).post(sites::create::<S, P>),
        )
        .route(
            "/sites/{id}",
            get(sites::get::<S, P>)
                .put(sites::update::<S, P>)
                .delete(sites::delete::<S, P>),
        )
        .route(
            "/sites/{id}/tags/{tag_id}",
            put(sites::tag::<S, P>).delete(sites::untag::<S, P>),
        )
        .route(
            "/sites/{id}/feedback",
            get(feedback::list_for_site::<S, P>).post(feedback::insert::<S, P>),
        )
        .route("/sites/{id}/rating", get(feedback::rating::<S, P>))
        .route(
            "/feedback/{id}/comment",
            put(feedback::modify_comment::<S, P>),
        )
        // Refreshment points and banners
        .route(
            "/refreshment-points",
            get(points::list::<S, P>).post(points::create::<S, P>),
        )
        .route(
            "/refreshment-points/{id}",
            get(points::get::<S, P>)
                .put(points::update::<S, P>)
                .delete(points::delete::<S, P>),
        )
        .route(
            "/refreshment-points/{id}/banners",
            get(points::list_banners::<S, P>).post(points::insert_banner::<S, P>),
        )
        .route(
            "/banners/{id}",
            put(points::replace_image::<S, P>).delete(points::delete_banner::<S, P>),
        )
        // Conventions
        .route(
            "/refreshment-points/{id}/conventions",
            get(conventions::history::<S, P>).post(conventions::request::<S, P>),
        )
        .route("/conventions/{id}", get(conventions::get::<S, P>))
        .route(
            "/conventions/{id}/activate",
            post(conventions::activate::<S, P>),
        )
        // Tags
        .route("/tags", get(tags::list::<S, P>).post(tags::create::<S, P>))
        .route("/tags/{id}", delete(tags::delete::<S, P>))
        // Users
        .route("/users", get(users::list::<S, P>).post(users::create::<S, P>))
        .route(
            "/users/{id}",
            get(users::get::<S, P>).delete(users::delete::<S, P>),
        )
        .route(
            "/users/{id}/roles/{role}",
            put(users::assign_role::<S, P>).delete(users::remove_role::<S, P>),
        )
        .route("/users/{id}/children", get(users::children::<S, P>))
        .route(
            "/users/{id}/children/{student_id}",
            put(users::assign_child::<S, P>).delete(users::remove_child::<S, P>),
        )
        // Enrollment requests
        .route(
            "/enrollment-requests",
            get(users::list_requests::<S, P>).post(users::submit_request::<S, P>),
        )
        .route(
            "/enrollment-requests/{id}",
            delete(users::reject_request::<S, P>),
        )
        .route(
            "/enrollment-requests/{id}/accept",
            post(users::accept_request::<S, P>),
        )
        // Curriculum
        .route(
            "/teachings",
            get(curriculum::list_teachings::<S, P>).post(curriculum::create_teaching::<S, P>),
        )
        .route(
            "/teachings/{id}",
            get(curriculum::get_teaching::<S, P>)
                .put(curriculum::rename_teaching::<S, P>)
                .delete(curriculum::delete_teaching::<S, P>),
        )
        .route(
            "/addresses",
            get(curriculum::list_addresses::<S, P>).post(curriculum::create_address::<S, P>),
        )
        .route(
            "/addresses/{id}",
            get(curriculum::get_address::<S, P>).delete(curriculum::delete_address::<S, P>),
        )
        .route(
            "/addresses/{id}/teachings/{teaching_id}",
            put(curriculum::assign_teaching::<S, P>).delete(curriculum::remove_teaching::<S, P>),
        )
        // School structure
        .route(
            "/academic-years",
            get(school::list_years::<S, P>).post(school::create_year::<S, P>),
        )
        .route(
            "/academic-years/{id}/classes",
            get(school::list_classes::<S, P>).post(school::create_class::<S, P>),
        )
        .route(
            "/classes/{id}",
            get(school::get_class::<S, P>).delete(school::delete_class::<S, P>),
        )
        .route(
            "/classes/{id}/students",
            get(school::list_students::<S, P>).post(school::enroll_student::<S, P>),
        )
        .route("/students/{id}", get(school::get_student::<S, P>))
        // Disciplinary notes
        .route(
            "/students/{id}/notes",
            get(notes::list::<S, P>).post(notes::insert::<S, P>),
        )
        .route(
            "/notes/{id}",
            get(notes::get::<S, P>)
                .put(notes::edit::<S, P>)
                .delete(notes::delete::<S, P>),
        )
        // Attendance
        .route(
            "/classes/{id}/register/{date}",
            get(attendance::get_register::<S, P>).put(attendance::save_register::<S, P>),
        )
        .route(
            "/students/{id}/attendance",
            get(attendance::student_records::<S, P>),
        )
        .route(
            "/students/{id}/justifications",
            get(attendance::list_justifications::<S, P>),
        )
        .route(
            "/attendance/{record_id}/justification",
            post(attendance::justify::<S, P>)
                .put(attendance::edit_justification::<S, P>)
                .delete(attendance::delete_justification::<S, P>),
        )
        // Report cards
        .route(
            "/students/{id}/report-cards",
            get(report_cards::list::<S, P>).post(report_cards::publish::<S, P>),
        )
        .route(
            "/students/{id}/report-cards/{year_id}/{term}",
            get(report_cards::get::<S, P>),
        )
}
