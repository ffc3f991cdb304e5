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
    // A pooled :memory: database is per-connection; keep a single one
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

/// Registers, approves, and logs in a fresh employee; returns their token.
async fn create_employee(app: &Router, email: &str) -> String {
    let apply = json!({
        "name": "Test Employee",
        "email": email,
        "password": "password123",
        "role": "Employee",
        "department": "Engineering"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registrations/apply")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&apply).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let registration_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/registrations/{registration_id}/approve"),
            DEFAULT_ADMIN_TOKEN,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "email": email,
                        "password": "password123"
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_auth_required() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/system/status", "wrong-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/system/status", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_mints_fresh_token() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "email": "admin@example.com",
                        "password": "wrong"
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "email": "admin@example.com",
                        "password": "admin123"
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(token, DEFAULT_ADMIN_TOKEN);
    assert_eq!(body["data"]["role"], "Admin");

    // The minted token authenticates; the old one is revoked
    let response = app
        .clone()
        .oneshot(get("/api/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["name"], "Administrator");

    let response = app
        .clone()
        .oneshot(get("/api/auth/me", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_workflow() {
    let app = spawn_app().await;

    let apply = json!({
        "name": "New Hire",
        "email": "hire@example.com",
        "password": "password123",
        "role": "Employee",
        "department": "Engineering"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registrations/apply")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&apply).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "Pending");
    // The stored hash is never serialized
    assert!(body["data"].get("password_hash").is_none());
    let registration_id = body["data"]["id"].as_i64().unwrap();

    // Second application for the same email conflicts
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registrations/apply")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&apply).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(get("/api/registrations/pending", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get("/api/registrations/pending/count", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["pending"], 1);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/registrations/{registration_id}/approve"),
            DEFAULT_ADMIN_TOKEN,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["email"], "hire@example.com");
    assert_eq!(body["data"]["status"], "Active");

    // The new account can log in
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "email": "hire@example.com",
                        "password": "password123"
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Applying again now trips the user-level duplicate check
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registrations/apply")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&apply).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The processed application moved to the approved list
    let response = app
        .clone()
        .oneshot(get("/api/registrations/approved", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // A processed application cannot be approved or rejected again
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/registrations/{registration_id}/approve"),
            DEFAULT_ADMIN_TOKEN,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/registrations/{registration_id}/reject"),
            DEFAULT_ADMIN_TOKEN,
            &json!({"reason": "Too late"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // And the retries created no extra account
    let response = app
        .clone()
        .oneshot(get("/api/users", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_registration_validation() {
    let app = spawn_app().await;

    // Self-service admin accounts are refused
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registrations/apply")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "name": "Sneaky",
                        "email": "sneaky@example.com",
                        "password": "password123",
                        "role": "Admin",
                        "department": "Management"
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Short passwords are refused
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registrations/apply")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "name": "Shorty",
                        "email": "shorty@example.com",
                        "password": "short",
                        "role": "Employee",
                        "department": "Engineering"
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_admin_only() {
    let app = spawn_app().await;
    let employee_token = create_employee(&app, "worker@example.com").await;

    let response = app
        .clone()
        .oneshot(get("/api/registrations/pending", &employee_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get("/api/registrations", &employee_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_employee_cannot_manage_tasks() {
    let app = spawn_app().await;
    let employee_token = create_employee(&app, "emp1@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/tasks",
            &employee_token,
            &json!({
                "title": "Not allowed",
                "assigned_to": 1,
                "estimated_hours": 2.0,
                "priority": "Low"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get("/api/tasks", &employee_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // But their own task list is fine
    let response = app
        .clone()
        .oneshot(get("/api/tasks/mine", &employee_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_notifications_flow() {
    let app = spawn_app().await;
    let employee_token = create_employee(&app, "notif@example.com").await;

    // Account approval leaves a welcome notification
    let response = app
        .clone()
        .oneshot(get("/api/notifications", &employee_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let list = body["data"].as_array().unwrap();
    assert!(!list.is_empty());
    assert_eq!(list[0]["kind"], "Welcome");

    let response = app
        .clone()
        .oneshot(get("/api/notifications/unread-count", &employee_token))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["data"]["unread"].as_u64().unwrap() >= 1);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/notifications/read-all",
            &employee_token,
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/notifications/unread-count", &employee_token))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["unread"], 0);
}

#[tokio::test]
async fn test_notification_create_requires_manager() {
    let app = spawn_app().await;
    let employee_token = create_employee(&app, "memo@example.com").await;

    let payload = json!({
        "user_id": 2,
        "kind": "General",
        "message": "All-hands at 3pm"
    });

    let response = app
        .clone()
        .oneshot(post_json("/api/notifications", &employee_token, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(post_json("/api/notifications", DEFAULT_ADMIN_TOKEN, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/notifications/unread", &employee_token))
        .await
        .unwrap();
    let body = json_body(response).await;
    let kinds: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["kind"].as_str())
        .collect();
    assert!(kinds.contains(&"General"));
}

#[tokio::test]
async fn test_manager_assignment_rejects_cycles() {
    let app = spawn_app().await;
    create_employee(&app, "chain@example.com").await;

    // Nobody manages themselves
    let response = app
        .clone()
        .oneshot(put_json(
            "/api/users/2",
            DEFAULT_ADMIN_TOKEN,
            &json!({"manager_id": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/users/2",
            DEFAULT_ADMIN_TOKEN,
            &json!({"manager_id": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["manager_id"], 1);

    // Closing the loop through the reporting chain is rejected
    let response = app
        .clone()
        .oneshot(put_json(
            "/api/users/1",
            DEFAULT_ADMIN_TOKEN,
            &json!({"manager_id": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get("/api/users/1/reports", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_users_directory_guards() {
    let app = spawn_app().await;
    let employee_token = create_employee(&app, "dir@example.com").await;

    let response = app
        .clone()
        .oneshot(get("/api/users", &employee_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get("/api/users", DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    // Seeded admin plus the new employee
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Only admins may deactivate accounts, and never their own
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/users/1/status")
                .header("X-Api-Key", DEFAULT_ADMIN_TOKEN)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({"status": "Inactive"})).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_department_report_skips_inactive_users() {
    let app = spawn_app().await;
    create_employee(&app, "soloist@example.com").await;

    let uri =
        "/api/productivity/departments/Engineering?start_date=2025-06-01&end_date=2025-06-30";
    let response = app
        .clone()
        .oneshot(get(uri, DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Deactivating the department's only member leaves nothing to report on
    let response = app
        .clone()
        .oneshot(put_json(
            "/api/users/2/status",
            DEFAULT_ADMIN_TOKEN,
            &json!({"status": "Inactive"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(uri, DEFAULT_ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
