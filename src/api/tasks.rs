use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::entities::task_time_entries;
use crate::services::{CreateTaskRequest, CurrentUser, TaskView, UpdateTaskRequest};

#[derive(Debug, Default, Deserialize)]
pub struct RejectTaskRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogTaskTimeRequest {
    pub date: NaiveDate,
    pub hours: f64,
    pub work_description: Option<String>,
}

/// POST /tasks
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<ApiResponse<TaskView>>, ApiError> {
    let task = state.task_service().create_task(&caller, payload).await?;
    Ok(Json(ApiResponse::success(task)))
}

/// GET /tasks
pub async fn list_all_tasks(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<TaskView>>>, ApiError> {
    let tasks = state.task_service().list_all_tasks(&caller).await?;
    Ok(Json(ApiResponse::success(tasks)))
}

/// GET /tasks/mine
pub async fn list_my_tasks(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<TaskView>>>, ApiError> {
    let tasks = state.task_service().list_my_tasks(&caller).await?;
    Ok(Json(ApiResponse::success(tasks)))
}

/// GET /tasks/awaiting-approval
pub async fn list_awaiting_approval(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<TaskView>>>, ApiError> {
    let tasks = state.task_service().list_awaiting_approval(&caller).await?;
    Ok(Json(ApiResponse::success(tasks)))
}

/// GET /tasks/overdue
pub async fn list_overdue(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<TaskView>>>, ApiError> {
    let tasks = state.task_service().list_overdue(&caller).await?;
    Ok(Json(ApiResponse::success(tasks)))
}

/// GET /tasks/{id}
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TaskView>>, ApiError> {
    let task = state.task_service().get_task(&caller, id).await?;
    Ok(Json(ApiResponse::success(task)))
}

/// PUT /tasks/{id}
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<TaskView>>, ApiError> {
    let task = state
        .task_service()
        .update_task(&caller, id, payload)
        .await?;
    Ok(Json(ApiResponse::success(task)))
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.task_service().delete_task(&caller, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Task {id} deleted"),
    })))
}

/// POST /tasks/{id}/start
pub async fn start_task(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TaskView>>, ApiError> {
    let task = state.task_service().start_task(&caller, id).await?;
    Ok(Json(ApiResponse::success(task)))
}

/// POST /tasks/{id}/complete
pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TaskView>>, ApiError> {
    let task = state.task_service().complete_task(&caller, id).await?;
    Ok(Json(ApiResponse::success(task)))
}

/// POST /tasks/{id}/approve
pub async fn approve_task(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TaskView>>, ApiError> {
    let task = state.task_service().approve_task(&caller, id).await?;
    Ok(Json(ApiResponse::success(task)))
}

/// POST /tasks/{id}/reject
pub async fn reject_task(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<RejectTaskRequest>,
) -> Result<Json<ApiResponse<TaskView>>, ApiError> {
    let task = state
        .task_service()
        .reject_task(&caller, id, payload.reason)
        .await?;
    Ok(Json(ApiResponse::success(task)))
}

/// POST /tasks/{id}/time
pub async fn log_task_time(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<LogTaskTimeRequest>,
) -> Result<Json<ApiResponse<task_time_entries::Model>>, ApiError> {
    let entry = state
        .task_service()
        .log_task_time(
            &caller,
            id,
            payload.date,
            payload.hours,
            payload.work_description,
        )
        .await?;
    Ok(Json(ApiResponse::success(entry)))
}

/// GET /tasks/{id}/time
pub async fn list_task_time(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<task_time_entries::Model>>>, ApiError> {
    let entries = state.task_service().list_task_time(&caller, id).await?;
    Ok(Json(ApiResponse::success(entries)))
}
