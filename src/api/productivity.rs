use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ScoreResponse};
use crate::services::{CurrentUser, ProductivityReport};

/// Inclusive date range for every report endpoint.
#[derive(Debug, Deserialize)]
pub struct ReportRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// GET /productivity/my-report?start_date=..&end_date=..
pub async fn my_report(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Query(range): Query<ReportRange>,
) -> Result<Json<ApiResponse<ProductivityReport>>, ApiError> {
    let report = state
        .productivity_service()
        .user_report(&caller, caller.id, range.start_date, range.end_date)
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// GET /productivity/users/{id}?start_date=..&end_date=..
pub async fn user_report(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
    Query(range): Query<ReportRange>,
) -> Result<Json<ApiResponse<ProductivityReport>>, ApiError> {
    let report = state
        .productivity_service()
        .user_report(&caller, user_id, range.start_date, range.end_date)
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// GET /productivity/departments/{name}?start_date=..&end_date=..
pub async fn department_report(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(department): Path<String>,
    Query(range): Query<ReportRange>,
) -> Result<Json<ApiResponse<ProductivityReport>>, ApiError> {
    let report = state
        .productivity_service()
        .department_report(&caller, &department, range.start_date, range.end_date)
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// GET /productivity/my-efficiency?start_date=..&end_date=..
pub async fn my_efficiency(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Query(range): Query<ReportRange>,
) -> Result<Json<ApiResponse<ScoreResponse>>, ApiError> {
    let score = state
        .productivity_service()
        .my_efficiency(&caller, range.start_date, range.end_date)
        .await?;
    Ok(Json(ApiResponse::success(ScoreResponse { score })))
}

/// GET /productivity/my-completion-rate?start_date=..&end_date=..
pub async fn my_completion_rate(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Query(range): Query<ReportRange>,
) -> Result<Json<ApiResponse<ScoreResponse>>, ApiError> {
    let score = state
        .productivity_service()
        .my_completion_rate(&caller, range.start_date, range.end_date)
        .await?;
    Ok(Json(ApiResponse::success(ScoreResponse { score })))
}
