use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse, TotalHoursResponse};
use crate::entities::time_logs;
use crate::services::time_log_service::TeamMemberLogs;
use crate::services::{CurrentUser, LogTimeRequest};

#[derive(Debug, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// POST /timelogs
pub async fn log_time(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<LogTimeRequest>,
) -> Result<Json<ApiResponse<time_logs::Model>>, ApiError> {
    let log = state.time_log_service().log_time(&caller, payload).await?;
    Ok(Json(ApiResponse::success(log)))
}

/// GET /timelogs/mine
pub async fn list_my_logs(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<time_logs::Model>>>, ApiError> {
    let logs = state.time_log_service().list_my_logs(&caller).await?;
    Ok(Json(ApiResponse::success(logs)))
}

/// GET /timelogs/user/{id}
pub async fn list_logs_for_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<time_logs::Model>>>, ApiError> {
    let logs = state
        .time_log_service()
        .list_logs_for_user(&caller, user_id)
        .await?;
    Ok(Json(ApiResponse::success(logs)))
}

/// GET /timelogs/{id}
pub async fn get_log(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<time_logs::Model>>, ApiError> {
    let log = state.time_log_service().get_log(&caller, id).await?;
    Ok(Json(ApiResponse::success(log)))
}

/// PUT /timelogs/{id}
pub async fn update_log(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<LogTimeRequest>,
) -> Result<Json<ApiResponse<time_logs::Model>>, ApiError> {
    let log = state
        .time_log_service()
        .update_log(&caller, id, payload)
        .await?;
    Ok(Json(ApiResponse::success(log)))
}

/// DELETE /timelogs/{id}
pub async fn delete_log(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.time_log_service().delete_log(&caller, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Time log {id} deleted"),
    })))
}

/// POST /timelogs/{id}/approve
pub async fn approve_log(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<time_logs::Model>>, ApiError> {
    let log = state.time_log_service().approve_log(&caller, id).await?;
    Ok(Json(ApiResponse::success(log)))
}

/// GET /timelogs/total-hours?start_date=..&end_date=..
pub async fn total_hours(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Query(range): Query<DateRange>,
) -> Result<Json<ApiResponse<TotalHoursResponse>>, ApiError> {
    let total_hours = state
        .time_log_service()
        .total_hours_in_range(&caller, range.start_date, range.end_date)
        .await?;
    Ok(Json(ApiResponse::success(TotalHoursResponse {
        total_hours,
    })))
}

#[derive(Debug, Deserialize)]
pub struct DailyTotalRequest {
    pub date: NaiveDate,
    pub user_ids: Vec<i32>,
}

/// POST /timelogs/daily-total
pub async fn daily_total(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<DailyTotalRequest>,
) -> Result<Json<ApiResponse<TotalHoursResponse>>, ApiError> {
    let total_hours = state
        .time_log_service()
        .total_hours_for_users_on(&caller, payload.date, payload.user_ids)
        .await?;
    Ok(Json(ApiResponse::success(TotalHoursResponse {
        total_hours,
    })))
}

/// GET /timelogs/team/{manager_id}
pub async fn team_logs(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(manager_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<TeamMemberLogs>>>, ApiError> {
    let team = state
        .time_log_service()
        .team_logs(&caller, manager_id)
        .await?;
    Ok(Json(ApiResponse::success(team)))
}
