use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tempora::config::Config;
use tempora::state::SharedState;
use tower::ServiceExt;

/// Default admin token seeded by migration (must match m20250601_initial.rs)
const DEFAULT_ADMIN_TOKEN: &str = "tempora_default_admin_token_please_rotate";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let shared = Arc::new(
        SharedState::new(config)
            .await
            .expect("Failed to create app state"),
    );
    let state = tempora::api::create_app_state(shared);
    tempora::api::router(state).await
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Api-Key", token)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-Api-Key", token)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn put_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("X-Api-Key", token)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Creates a task assigned to the seeded admin and returns its id.
async fn create_task(app: &Router, title: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/tasks",
            DEFAULT_ADMIN_TOKEN,
            &json!({
                "title": title,
                "description": "Integration test task",
                "assigned_to": 1,
                "estimated_hours": 4.0,
                "priority": "Medium"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "Pending");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_task_lifecycle_to_approval() {
    let app = spawn_app().await;
    let id = create_task(&app, "Quarterly report").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/tasks/{id}/start"),
            DEFAULT_ADMIN_TOKEN,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "InProgress");
    assert!(body["data"]["started_at"].is_string());

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/tasks/{id}/complete"),
            DEFAULT_ADMIN_TOKEN,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "Completed");
    assert!(body["data"]["completed_at"].is_string());

    // Completed tasks created by the caller show up as awaiting approval
    let response = app
        .clone()
        .oneshot(get("/api/tasks/awaiting-approval", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/tasks/{id}/approve"),
            DEFAULT_ADMIN_TOKEN,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "Approved");
    assert_eq!(body["data"]["is_approved"], true);
    assert!(body["data"]["approved_at"].is_string());

    // Approval is terminal
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/tasks/{id}/start"),
            DEFAULT_ADMIN_TOKEN,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Hours can still be booked after approval; time entries are
    // bookkeeping, not lifecycle steps
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/tasks/{id}/time"),
            DEFAULT_ADMIN_TOKEN,
            &json!({"date": "2025-06-02", "hours": 1.5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Approved tasks cannot be edited or deleted
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/api/tasks/{id}"),
            DEFAULT_ADMIN_TOKEN,
            &json!({"title": "Renamed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/tasks/{id}"))
                .header("X-Api-Key", DEFAULT_ADMIN_TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_task_rejection_reopens_work() {
    let app = spawn_app().await;
    let id = create_task(&app, "Design review").await;

    for step in ["start", "complete"] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/tasks/{id}/{step}"),
                DEFAULT_ADMIN_TOKEN,
                &json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/tasks/{id}/reject"),
            DEFAULT_ADMIN_TOKEN,
            &json!({"reason": "Missing diagrams"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "InProgress");
    assert!(body["data"]["completed_at"].is_null());

    // The assignee is told about the rejection
    let response = app
        .clone()
        .oneshot(get("/api/notifications", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    let body = json_body(response).await;
    let kinds: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["kind"].as_str())
        .collect();
    assert!(kinds.contains(&"TaskRejected"));

    // Rejecting a task that is not completed conflicts
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/tasks/{id}/reject"),
            DEFAULT_ADMIN_TOKEN,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Reassignment to a nonexistent user is refused
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/api/tasks/{id}"),
            DEFAULT_ADMIN_TOKEN,
            &json!({"assigned_to": 999}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_task_time_entries() {
    let app = spawn_app().await;
    let id = create_task(&app, "Data migration").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/tasks/{id}/time"),
            DEFAULT_ADMIN_TOKEN,
            &json!({
                "date": "2025-06-02",
                "hours": 3.5,
                "work_description": "Schema mapping"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Out-of-range hours are rejected
    for bad_hours in [0.0, 25.0] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/tasks/{id}/time"),
                DEFAULT_ADMIN_TOKEN,
                &json!({"date": "2025-06-02", "hours": bad_hours}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/api/tasks/{id}/time"), DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Entries roll up into the task's actual hours
    let response = app
        .clone()
        .oneshot(get(&format!("/api/tasks/{id}"), DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["actual_hours"], 3.5);
}

#[tokio::test]
async fn test_time_log_workflow() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/timelogs",
            DEFAULT_ADMIN_TOKEN,
            &json!({
                "date": "2025-06-02",
                "start_time": "09:00:00",
                "end_time": "17:30:00",
                "break_minutes": 30
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["total_hours"], 8.0);
    let log_id = body["data"]["id"].as_i64().unwrap();

    // One log per day
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/timelogs",
            DEFAULT_ADMIN_TOKEN,
            &json!({
                "date": "2025-06-02",
                "start_time": "10:00:00",
                "end_time": "12:00:00",
                "break_minutes": 0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // End before start is invalid
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/timelogs",
            DEFAULT_ADMIN_TOKEN,
            &json!({
                "date": "2025-06-03",
                "start_time": "17:00:00",
                "end_time": "09:00:00",
                "break_minutes": 0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The range total reflects the single 8 hour log
    let response = app
        .clone()
        .oneshot(get(
            "/api/timelogs/total-hours?start_date=2025-06-01&end_date=2025-06-30",
            DEFAULT_ADMIN_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["total_hours"], 8.0);

    // The one-day aggregate sums across the given user set; unknown ids
    // simply contribute nothing
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/timelogs/daily-total",
            DEFAULT_ADMIN_TOKEN,
            &json!({"date": "2025-06-02", "user_ids": [1, 99]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["total_hours"], 8.0);

    // Approve, then the log is locked
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/timelogs/{log_id}/approve"),
            DEFAULT_ADMIN_TOKEN,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["is_approved"], true);

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/api/timelogs/{log_id}"),
            DEFAULT_ADMIN_TOKEN,
            &json!({
                "date": "2025-06-02",
                "start_time": "08:00:00",
                "end_time": "16:00:00",
                "break_minutes": 0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/timelogs/{log_id}"))
                .header("X-Api-Key", DEFAULT_ADMIN_TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_productivity_report() {
    let app = spawn_app().await;

    // One full day logged, one task completed out of one assigned
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/timelogs",
            DEFAULT_ADMIN_TOKEN,
            &json!({
                "date": "2025-06-02",
                "start_time": "09:00:00",
                "end_time": "17:30:00",
                "break_minutes": 30
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let id = create_task(&app, "Sprint work").await;
    for step in ["start", "complete"] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/tasks/{id}/{step}"),
                DEFAULT_ADMIN_TOKEN,
                &json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let today = chrono::Utc::now().date_naive();
    let uri = format!(
        "/api/productivity/users/1?start_date=2025-06-01&end_date={}",
        today.format("%Y-%m-%d")
    );
    let response = app
        .clone()
        .oneshot(get(&uri, DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["data"]["report_scope"], "User");
    assert_eq!(body["data"]["target_name"], "Administrator");
    assert_eq!(body["data"]["total_hours_logged"], 8.0);
    assert_eq!(body["data"]["total_tasks_assigned"], 1);
    assert_eq!(body["data"]["tasks_completed"], 1);
    assert_eq!(body["data"]["task_completion_rate"], 100.0);
    assert!(!body["data"]["daily_breakdown"].as_array().unwrap().is_empty());

    // Reversed ranges are rejected
    let response = app
        .clone()
        .oneshot(get(
            "/api/productivity/users/1?start_date=2025-06-30&end_date=2025-06-01",
            DEFAULT_ADMIN_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get(
            &format!(
                "/api/productivity/my-completion-rate?start_date=2025-06-01&end_date={}",
                today.format("%Y-%m-%d")
            ),
            DEFAULT_ADMIN_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["score"], 100.0);

    // Unknown departments report as empty
    let response = app
        .clone()
        .oneshot(get(
            "/api/productivity/departments/Nowhere?start_date=2025-06-01&end_date=2025-06-30",
            DEFAULT_ADMIN_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
