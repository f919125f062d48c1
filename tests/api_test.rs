use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use marketplace::api::{USER_HEADER, router};
use marketplace::db::{self, SqliteStore};
use marketplace::fixtures::DEMO_CLIENT_ID;
use marketplace::notify::RecordingNotifier;
use marketplace::state::AppState;
use marketplace::storage::MemoryStorage;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn setup_app() -> (Router, Arc<RecordingNotifier>) {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to create test db");
    db::migrate(&pool).await.expect("Failed to run migrations");
    SqliteStore::new(pool.clone())
        .seed_demo()
        .await
        .expect("Failed to seed demo data");

    let notifier = Arc::new(RecordingNotifier::new());
    let state = AppState::new(pool, Arc::new(MemoryStorage::new()), notifier.clone(), 9);
    (router(state), notifier)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, user: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_HEADER, user)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn titles(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup_app().await;
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_filters_and_echoes_query() {
    let (app, _) = setup_app().await;

    let (status, body) = send(&app, get("/courses?level=beginner&bogus=1", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&body),
        vec!["UI/UX Design Fundamentals", "Business Analytics Fundamentals"]
    );
    assert_eq!(body["total"], 2);
    assert_eq!(body["query"], "level=beginner");
}

#[tokio::test]
async fn test_missing_course_is_404() {
    let (app, _) = setup_app().await;
    let (status, body) = send(&app, get("/courses/course-404", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
async fn test_pending_requests_tab() {
    let (app, _) = setup_app().await;
    let (status, body) = send(
        &app,
        get("/me/session-requests?activeTab=pending", Some(DEMO_CLIENT_ID)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
}

#[tokio::test]
async fn test_missing_user_header_is_rejected() {
    let (app, _) = setup_app().await;
    let (status, _) = send(&app, get("/me/enrollments", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_completed_enrollments_over_http() {
    let (app, _) = setup_app().await;
    let (status, body) = send(
        &app,
        get("/me/enrollments?activeTab=completed", Some(DEMO_CLIENT_ID)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<(String, i64)> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            (
                row["course_title"].as_str().unwrap().to_string(),
                row["progress"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("UI/UX Design Fundamentals".to_string(), 100),
            ("Data Science with Python".to_string(), 100),
        ]
    );
}

#[tokio::test]
async fn test_foreign_teacher_cannot_toggle_course() {
    let (app, notifier) = setup_app().await;

    let request = Request::patch("/teacher/courses/course-1/status")
        .header(USER_HEADER, "teacher-2")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(notifier.last().unwrap().title, "Action not allowed");

    let (_, course) = send(&app, get("/courses/course-1", None)).await;
    assert_eq!(course["status"], "active");
}

#[tokio::test]
async fn test_wizard_step_reports_field_errors() {
    let (app, _) = setup_app().await;
    let draft = json!({
        "schedule": {
            "price": 20.0,
            "start_date": "2025-04-10",
            "end_date": "2025-04-01",
            "max_students": 10,
            "duration": "2 weeks"
        }
    });

    let (status, body) = send(
        &app,
        json_request("POST", "/teacher/courses/wizard/3", "teacher-1", draft.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["fields"]["end_date"][0],
        "The end date must be after the start date."
    );

    let (status, _) = send(
        &app,
        json_request("POST", "/teacher/courses/wizard/9", "teacher-1", draft),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_double_enrollment_conflicts() {
    let (app, _) = setup_app().await;

    let (status, _) = send(
        &app,
        json_request("POST", "/me/enrollments", DEMO_CLIENT_ID, json!({"course_id": "course-8"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        json_request("POST", "/me/enrollments", DEMO_CLIENT_ID, json!({"course_id": "course-8"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_dashboard_counts_enrollments() {
    let (app, _) = setup_app().await;
    let (status, body) = send(&app, get("/me/dashboard", Some(DEMO_CLIENT_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enrolled"], 5);
    assert_eq!(body["completed"], 2);
    assert_eq!(body["average_progress"], 68);
    assert_eq!(body["pending_requests"], 4);
}

#[tokio::test]
async fn test_session_detail_is_owner_only() {
    let (app, _) = setup_app().await;

    let (status, body) = send(&app, get("/me/sessions/session-2", Some(DEMO_CLIENT_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "session-2");

    let (status, _) = send(&app, get("/me/sessions/session-2", Some("client-2"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, get("/me/sessions/session-404", Some(DEMO_CLIENT_ID))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
