//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use casebook_app::ports::Store;

use crate::state::{AppState, Publisher};

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api`. Includes a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build<S: Store, P: Publisher>(state: AppState<S, P>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use casebook_adapter_storage_sqlite_sqlx::{Config, SqliteStore};
    use casebook_app::event_bus::InProcessEventBus;
    use casebook_domain::event::EventKind;
    use casebook_domain::time::today;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn store() -> SqliteStore {
        Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
        .store()
    }

    async fn app() -> Router {
        build(AppState::new(store().await, InProcessEventBus::new(64)))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register_tourist(app: &Router, username: &str) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/tourists",
            Some(json!({
                "username": username,
                "email": format!("{username}@mail.example.org"),
                "password": "Secret#2024",
                "confirm_password": "Secret#2024",
                "full_name": "Mario Rossi",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_site(app: &Router) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/sites",
            Some(json!({
                "name": "Colosseum",
                "location": "Rome",
                "description": "Flavian amphitheatre",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a year, a class and one enrolled student.
    async fn seed_school(app: &Router) -> (String, String, String) {
        let (_, year) = call(
            app,
            Method::POST,
            "/api/academic-years",
            Some(json!({ "start_year": 2024 })),
        )
        .await;
        let year_id = year["id"].as_str().unwrap().to_string();
        let (_, class) = call(
            app,
            Method::POST,
            &format!("/api/academic-years/{year_id}/classes"),
            Some(json!({ "name": "3A" })),
        )
        .await;
        let class_id = class["id"].as_str().unwrap().to_string();
        let (status, student) = call(
            app,
            Method::POST,
            &format!("/api/classes/{class_id}/students"),
            Some(json!({
                "full_name": "Luca Verdi",
                "email": "luca@school.example.org",
                "parent_email": "parent@mail.example.org",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let student_id = student["id"].as_str().unwrap().to_string();
        (year_id, class_id, student_id)
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_answer_bad_request_when_path_id_is_malformed() {
        let app = app().await;
        let (status, body) = call(&app, Method::GET, "/api/tourists/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation error: tourist_id has an invalid format");
    }

    #[tokio::test]
    async fn should_answer_not_found_when_tourist_is_unknown() {
        let app = app().await;
        let (status, body) = call(
            &app,
            Method::GET,
            "/api/tourists/00000000-0000-4000-8000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("Tourist"));
    }

    #[tokio::test]
    async fn should_register_search_and_login_tourist() {
        let app = app().await;
        let id = register_tourist(&app, "mario").await;

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/tourists",
            Some(json!({
                "username": "mario",
                "email": "other@mail.example.org",
                "password": "Secret#2024",
                "confirm_password": "Secret#2024",
                "full_name": "Another Mario",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, found) = call(&app, Method::GET, "/api/tourists?q=ROSSI", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert!(found[0].get("password").is_none());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/tourists",
            Some(json!({ "username": "mario", "password": "Secret#2024" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/auth/tourists",
            Some(json!({ "username": "mario", "password": "Wrong#2024" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_reject_invalid_registration_with_bad_request() {
        let app = app().await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/tourists",
            Some(json!({
                "username": "x",
                "email": "not-an-email",
                "password": "weak",
                "confirm_password": "weak",
                "full_name": "Mario Rossi",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn should_release_feedback_once_per_site() {
        let app = app().await;
        let tourist = register_tourist(&app, "mario").await;
        let other = register_tourist(&app, "giulia").await;
        let site = create_site(&app).await;
        let uri = format!("/api/sites/{site}/feedback");

        let (status, feedback) = call(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "tourist_id": tourist, "vote": 4, "comment": "Impressive" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let feedback_id = feedback["id"].as_str().unwrap().to_string();

        let (status, _) = call(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "tourist_id": tourist, "vote": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "tourist_id": other, "vote": 9 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, rating) = call(&app, Method::GET, &format!("/api/sites/{site}/rating"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rating["votes"], 1);
        assert_eq!(rating["average"], 4.0);

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/api/feedback/{feedback_id}/comment"),
            Some(json!({ "tourist_id": other, "comment": "Not mine" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn should_answer_json_bad_request_when_vote_does_not_fit_a_byte() {
        let app = app().await;
        let tourist = register_tourist(&app, "mario").await;
        let site = create_site(&app).await;

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/sites/{site}/feedback"),
            Some(json!({ "tourist_id": tourist, "vote": 300 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("vote"));
    }

    #[tokio::test]
    async fn should_filter_sites_by_tag() {
        let app = app().await;
        let site = create_site(&app).await;
        let (_, tag) = call(
            &app,
            Method::POST,
            "/api/tags",
            Some(json!({ "name": "Roman", "description": "Roman era" })),
        )
        .await;
        let tag_id = tag["id"].as_str().unwrap().to_string();

        let (status, tagged) = call(
            &app,
            Method::PUT,
            &format!("/api/sites/{site}/tags/{tag_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tagged["tags"][0], tag_id.as_str());

        let (_, found) = call(&app, Method::GET, &format!("/api/sites?tag={tag_id}"), None).await;
        assert_eq!(found.as_array().unwrap().len(), 1);

        let (status, _) = call(&app, Method::GET, "/api/sites?tag=bogus", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_record_absence_and_notify_through_bus() {
        let bus = InProcessEventBus::new(8);
        let app = build(AppState::new(store().await, bus.clone()));
        let mut events = bus.subscribe();
        let (_, class_id, student_id) = seed_school(&app).await;
        let date = today();

        let (status, records) = call(
            &app,
            Method::PUT,
            &format!("/api/classes/{class_id}/register/{date}"),
            Some(json!({ "entries": [{ "student_id": student_id, "status": "absent" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(records.as_array().unwrap().len(), 1);

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::AbsenceRecorded);
        assert_eq!(event.data["parent_email"], "parent@mail.example.org");

        let (_, register) = call(
            &app,
            Method::GET,
            &format!("/api/classes/{class_id}/register/{date}"),
            None,
        )
        .await;
        assert_eq!(register["entries"][0]["status"], "absent");
    }

    #[tokio::test]
    async fn should_justify_an_absence_only_once() {
        let app = app().await;
        let (_, class_id, student_id) = seed_school(&app).await;
        let date = today();
        let (_, records) = call(
            &app,
            Method::PUT,
            &format!("/api/classes/{class_id}/register/{date}"),
            Some(json!({ "entries": [{ "student_id": student_id, "status": "absent" }] })),
        )
        .await;
        let record_id = records[0]["id"].as_str().unwrap().to_string();
        let uri = format!("/api/attendance/{record_id}/justification");

        let (status, _) = call(&app, Method::POST, &uri, Some(json!({ "reason": "Flu" }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(&app, Method::POST, &uri, Some(json!({ "reason": "Again" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, listed) = call(
            &app,
            Method::GET,
            &format!("/api/students/{student_id}/justifications"),
            None,
        )
        .await;
        assert_eq!(listed[0]["reason"], "Flu");

        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn should_edit_and_delete_justification_when_register_is_saved_again() {
        let app = app().await;
        let (_, class_id, student_id) = seed_school(&app).await;
        let register_uri = format!("/api/classes/{class_id}/register/{}", today());
        let absent = json!({ "entries": [{ "student_id": student_id, "status": "absent" }] });
        let (_, records) = call(&app, Method::PUT, &register_uri, Some(absent.clone())).await;
        let record_id = records[0]["id"].as_str().unwrap().to_string();
        let uri = format!("/api/attendance/{record_id}/justification");

        let (status, _) = call(&app, Method::POST, &uri, Some(json!({ "reason": "Flu" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, resaved) = call(&app, Method::PUT, &register_uri, Some(absent)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resaved[0]["id"], record_id.as_str());

        let (status, edited) = call(&app, Method::PUT, &uri, Some(json!({ "reason": "Dentist" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["reason"], "Dentist");
        assert_eq!(edited["record_id"], record_id.as_str());

        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(&app, Method::PUT, &uri, Some(json!({ "reason": "Late edit" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_reject_register_dated_in_the_future() {
        let app = app().await;
        let (_, class_id, student_id) = seed_school(&app).await;
        let tomorrow = today().succ_opt().unwrap();

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/api/classes/{class_id}/register/{tomorrow}"),
            Some(json!({ "entries": [{ "student_id": student_id, "status": "late", "minutes": 10 }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::GET,
            &format!("/api/classes/{class_id}/register/18-10-2024"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_publish_and_fetch_report_card_by_term() {
        let app = app().await;
        let (year_id, _, student_id) = seed_school(&app).await;

        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/api/students/{student_id}/report-cards"),
            Some(json!({
                "academic_year_id": year_id,
                "term": "first",
                "grades": [{ "subject": "Mathematics", "score": 85 }],
                "teacher_comment": "Good work",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, card) = call(
            &app,
            Method::GET,
            &format!("/api/students/{student_id}/report-cards/{year_id}/first"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(card["grades"][0]["score"], 85);

        let (status, _) = call(
            &app,
            Method::GET,
            &format!("/api/students/{student_id}/report-cards/{year_id}/second"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_assign_roles_to_users() {
        let app = app().await;
        let (status, user) = call(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({
                "login": "bianchi",
                "full_name": "Anna Bianchi",
                "email": "anna@smos.example.org",
                "password": "Teach#2024",
                "confirm_password": "Teach#2024",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = user["id"].as_str().unwrap().to_string();

        let (status, user) = call(&app, Method::PUT, &format!("/api/users/{id}/roles/teacher"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["roles"], json!(["teacher"]));

        let (status, _) = call(&app, Method::PUT, &format!("/api/users/{id}/roles/janitor"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    async fn create_user(app: &Router, login: &str, roles: Value) -> String {
        let (status, user) = call(
            app,
            Method::POST,
            "/api/users",
            Some(json!({
                "login": login,
                "full_name": "Anna Bianchi",
                "email": format!("{login}@smos.example.org"),
                "password": "Teach#2024",
                "confirm_password": "Teach#2024",
                "roles": roles,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        user["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn should_record_edit_and_delete_note() {
        let app = app().await;
        let (_, _, student) = seed_school(&app).await;
        let teacher = create_user(&app, "bianchi", json!(["teacher"])).await;
        let janitor = create_user(&app, "neri", json!(["ata"])).await;
        let note = |author: &str| {
            json!({
                "teacher_id": author,
                "date": today(),
                "description": "phone in class",
            })
        };
        let uri = format!("/api/students/{student}/notes");

        let (status, _) = call(&app, Method::POST, &uri, Some(note(janitor.as_str()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, created) = call(&app, Method::POST, &uri, Some(note(teacher.as_str()))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap();

        let (status, edited) = call(
            &app,
            Method::PUT,
            &format!("/api/notes/{id}"),
            Some(json!({ "description": "phone in class, twice" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["description"], "phone in class, twice");
        let (_, listed) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, _) = call(&app, Method::DELETE, &format!("/api/notes/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::GET, &format!("/api/notes/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_accept_enrollment_request_and_link_child_to_parent() {
        let app = app().await;
        let (_, _, student) = seed_school(&app).await;
        let (status, request) = call(
            &app,
            Method::POST,
            "/api/enrollment-requests",
            Some(json!({
                "login": "lverdi",
                "full_name": "Luca Verdi",
                "email": "luca@mail.example.org",
                "password": "Study#2024",
                "confirm_password": "Study#2024",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(request.get("password").is_none());
        let request_id = request["id"].as_str().unwrap();

        let (status, user) = call(
            &app,
            Method::POST,
            &format!("/api/enrollment-requests/{request_id}/accept"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["roles"], json!(["student"]));
        let (_, pending) = call(&app, Method::GET, "/api/enrollment-requests", None).await;
        assert_eq!(pending, json!([]));

        let parent = create_user(&app, "verdi", json!(["parent"])).await;
        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/api/users/{parent}/children/{student}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, children) = call(&app, Method::GET, &format!("/api/users/{parent}/children"), None).await;
        assert_eq!(children[0]["id"], student.as_str());
    }

    #[tokio::test]
    async fn should_manage_teachings_of_an_address() {
        let app = app().await;
        let (status, maths) = call(
            &app,
            Method::POST,
            "/api/teachings",
            Some(json!({ "name": "Mathematics" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let maths = maths["id"].as_str().unwrap();
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/teachings",
            Some(json!({ "name": "MATHEMATICS" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, address) = call(
            &app,
            Method::POST,
            "/api/addresses",
            Some(json!({ "name": "Scientific high school" })),
        )
        .await;
        let address = address["id"].as_str().unwrap();
        let (status, updated) = call(
            &app,
            Method::PUT,
            &format!("/api/addresses/{address}/teachings/{maths}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["teachings"], json!([maths]));

        let (status, _) = call(&app, Method::DELETE, &format!("/api/teachings/{maths}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, fetched) = call(&app, Method::GET, &format!("/api/addresses/{address}"), None).await;
        assert_eq!(fetched["teachings"], json!([]));
    }

    #[tokio::test]
    async fn should_search_points_and_activate_convention_once() {
        let app = app().await;
        let (status, point) = call(
            &app,
            Method::POST,
            "/api/refreshment-points",
            Some(json!({ "name": "Bar Roma", "address": "Via del Corso 1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let point = point["id"].as_str().unwrap();
        let (_, found) = call(&app, Method::GET, "/api/refreshment-points?q=corso", None).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        let (_, found) = call(&app, Method::GET, "/api/refreshment-points?q=napoli", None).await;
        assert_eq!(found, json!([]));

        let end = today().succ_opt().unwrap();
        let (status, convention) = call(
            &app,
            Method::POST,
            &format!("/api/refreshment-points/{point}/conventions"),
            Some(json!({ "agency": "Amalfi Tours", "start_date": today(), "end_date": end })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(convention["status"], "pending");
        let id = convention["id"].as_str().unwrap();

        let uri = format!("/api/conventions/{id}/activate");
        let (status, active) = call(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(active["status"], "active");
        let (status, body) = call(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn should_suggest_sites_from_search_preferences() {
        let app = app().await;
        let tourist = register_tourist(&app, "mario").await;
        let site = create_site(&app).await;
        let (_, tag) = call(
            &app,
            Method::POST,
            "/api/tags",
            Some(json!({ "name": "Roman", "description": "Roman era" })),
        )
        .await;
        let tag = tag["id"].as_str().unwrap();
        call(&app, Method::PUT, &format!("/api/sites/{site}/tags/{tag}"), None).await;

        let uri = format!("/api/tourists/{tourist}/search-preferences");
        let (status, _) = call(&app, Method::PUT, &uri, Some(json!({ "tags": ["not-a-tag"] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, preferences) = call(&app, Method::PUT, &uri, Some(json!({ "tags": [tag] }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(preferences["tags"], json!([tag]));

        let (_, suggested) = call(
            &app,
            Method::GET,
            &format!("/api/tourists/{tourist}/suggested-sites"),
            None,
        )
        .await;
        assert_eq!(suggested[0]["id"], site.as_str());
    }
}
