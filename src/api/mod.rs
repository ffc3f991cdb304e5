use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod auth;
mod error;
mod notifications;
mod productivity;
mod registrations;
mod system;
mod tasks;
mod time_logs;
mod types;
mod users;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn task_service(&self) -> &Arc<dyn crate::services::TaskService> {
        &self.shared.task_service
    }

    #[must_use]
    pub fn time_log_service(&self) -> &Arc<dyn crate::services::TimeLogService> {
        &self.shared.time_log_service
    }

    #[must_use]
    pub fn registration_service(&self) -> &Arc<dyn crate::services::RegistrationService> {
        &self.shared.registration_service
    }

    #[must_use]
    pub fn productivity_service(&self) -> &Arc<dyn crate::services::ProductivityService> {
        &self.shared.productivity_service
    }

    #[must_use]
    pub fn notification_service(&self) -> &Arc<dyn crate::services::NotificationService> {
        &self.shared.notification_service
    }

    #[must_use]
    pub fn directory_service(&self) -> &Arc<dyn crate::services::DirectoryService> {
        &self.shared.directory_service
    }
}

pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.shared.config.read().await;
        config.server.cors_allowed_origins.clone()
    };

    let protected_routes = create_protected_router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::auth_middleware,
    ));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/registrations/apply", post(registrations::apply))
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/change-password", post(auth::change_password))
        .route("/tasks", post(tasks::create_task))
        .route("/tasks", get(tasks::list_all_tasks))
        .route("/tasks/mine", get(tasks::list_my_tasks))
        .route("/tasks/awaiting-approval", get(tasks::list_awaiting_approval))
        .route("/tasks/overdue", get(tasks::list_overdue))
        .route("/tasks/{id}", get(tasks::get_task))
        .route("/tasks/{id}", put(tasks::update_task))
        .route("/tasks/{id}", delete(tasks::delete_task))
        .route("/tasks/{id}/start", post(tasks::start_task))
        .route("/tasks/{id}/complete", post(tasks::complete_task))
        .route("/tasks/{id}/approve", post(tasks::approve_task))
        .route("/tasks/{id}/reject", post(tasks::reject_task))
        .route("/tasks/{id}/time", post(tasks::log_task_time))
        .route("/tasks/{id}/time", get(tasks::list_task_time))
        .route("/timelogs", post(time_logs::log_time))
        .route("/timelogs/mine", get(time_logs::list_my_logs))
        .route("/timelogs/total-hours", get(time_logs::total_hours))
        .route("/timelogs/daily-total", post(time_logs::daily_total))
        .route("/timelogs/team/{id}", get(time_logs::team_logs))
        .route("/timelogs/user/{id}", get(time_logs::list_logs_for_user))
        .route("/timelogs/{id}", get(time_logs::get_log))
        .route("/timelogs/{id}", put(time_logs::update_log))
        .route("/timelogs/{id}", delete(time_logs::delete_log))
        .route("/timelogs/{id}/approve", post(time_logs::approve_log))
        .route("/registrations", get(registrations::list_all))
        .route("/registrations/pending", get(registrations::list_pending))
        .route("/registrations/pending/count", get(registrations::pending_count))
        .route("/registrations/approved", get(registrations::list_approved))
        .route("/registrations/rejected", get(registrations::list_rejected))
        .route("/registrations/{id}/approve", post(registrations::approve))
        .route("/registrations/{id}/reject", post(registrations::reject))
        .route("/registrations/{id}", delete(registrations::delete))
        .route("/productivity/my-report", get(productivity::my_report))
        .route("/productivity/users/{id}", get(productivity::user_report))
        .route(
            "/productivity/departments/{name}",
            get(productivity::department_report),
        )
        .route("/productivity/my-efficiency", get(productivity::my_efficiency))
        .route(
            "/productivity/my-completion-rate",
            get(productivity::my_completion_rate),
        )
        .route("/notifications", get(notifications::list_mine))
        .route("/notifications", post(notifications::create))
        .route("/notifications/unread", get(notifications::list_unread))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/users", get(users::list_users))
        .route("/users/department/{name}", get(users::list_department))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}", put(users::update_user))
        .route("/users/{id}/reports", get(users::list_reports))
        .route("/users/{id}/status", put(users::set_status))
        .route("/system/status", get(system::get_status))
}
