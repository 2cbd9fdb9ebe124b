//! JSON REST handlers for SMOS users, their roles, enrollment requests and
//! the children linked to parent accounts.

use axum::Json;
use axum::extract::{Path, State};

use casebook_app::ports::Store;
use casebook_domain::enrollment::{EnrollmentForm, EnrollmentRequest};
use casebook_domain::id::{EnrollmentRequestId, StudentId, UserId};
use casebook_domain::student::Student;
use casebook_domain::user::{NewUserForm, Role, User};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse, parse};
use crate::error::ApiError;
use crate::state::{AppState, Publisher};

/// `GET /api/users`
pub async fn list<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
) -> Result<ListResponse<User>, ApiError> {
    let users = state.users.list().await?;
    Ok(ListResponse::Ok(Json(users)))
}

/// `POST /api/users`
pub async fn create<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(form): Json<NewUserForm>,
) -> Result<CreateResponse<User>, ApiError> {
    let user = state.users.create(&form).await?;
    Ok(CreateResponse::Created(Json(user)))
}

/// `GET /api/users/:id`
pub async fn get<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse<User>, ApiError> {
    let id: UserId = parse(&id, "user_id")?;
    let user = state.users.get(id).await?;
    Ok(GetResponse::Ok(Json(user)))
}

/// `DELETE /api/users/:id`
pub async fn delete<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: UserId = parse(&id, "user_id")?;
    state.users.delete(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `PUT /api/users/:id/roles/:role`
pub async fn assign_role<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, role)): Path<(String, String)>,
) -> Result<GetResponse<User>, ApiError> {
    let id: UserId = parse(&id, "user_id")?;
    let role: Role = role.parse()?;
    let user = state.users.assign_role(id, role).await?;
    Ok(GetResponse::Ok(Json(user)))
}

/// `DELETE /api/users/:id/roles/:role`
pub async fn remove_role<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, role)): Path<(String, String)>,
) -> Result<GetResponse<User>, ApiError> {
    let id: UserId = parse(&id, "user_id")?;
    let role: Role = role.parse()?;
    let user = state.users.remove_role(id, role).await?;
    Ok(GetResponse::Ok(Json(user)))
}

/// `GET /api/users/:id/children`
pub async fn children<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<ListResponse<Student>, ApiError> {
    let id: UserId = parse(&id, "user_id")?;
    let children = state.users.children(id).await?;
    Ok(ListResponse::Ok(Json(children)))
}

/// `PUT /api/users/:id/children/:student_id`
pub async fn assign_child<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, student)): Path<(String, String)>,
) -> Result<DeleteResponse, ApiError> {
    let id: UserId = parse(&id, "user_id")?;
    let student: StudentId = parse(&student, "student_id")?;
    state.users.assign_child(id, student).await?;
    Ok(DeleteResponse::NoContent)
}

/// `DELETE /api/users/:id/children/:student_id`
pub async fn remove_child<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path((id, student)): Path<(String, String)>,
) -> Result<DeleteResponse, ApiError> {
    let id: UserId = parse(&id, "user_id")?;
    let student: StudentId = parse(&student, "student_id")?;
    state.users.remove_child(id, student).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/enrollment-requests`
pub async fn list_requests<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
) -> Result<ListResponse<EnrollmentRequest>, ApiError> {
    let requests = state.users.pending_requests().await?;
    Ok(ListResponse::Ok(Json(requests)))
}

/// `POST /api/enrollment-requests`
pub async fn submit_request<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Json(form): Json<EnrollmentForm>,
) -> Result<CreateResponse<EnrollmentRequest>, ApiError> {
    let request = state.users.submit_request(&form).await?;
    Ok(CreateResponse::Created(Json(request)))
}

/// `POST /api/enrollment-requests/:id/accept`
pub async fn accept_request<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<CreateResponse<User>, ApiError> {
    let id: EnrollmentRequestId = parse(&id, "request_id")?;
    let user = state.users.accept_request(id).await?;
    Ok(CreateResponse::Created(Json(user)))
}

/// `DELETE /api/enrollment-requests/:id`
pub async fn reject_request<S: Store, P: Publisher>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    let id: EnrollmentRequestId = parse(&id, "request_id")?;
    state.users.reject_request(id).await?;
    Ok(DeleteResponse::NoContent)
}
