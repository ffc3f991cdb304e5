use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::entities::enums::UserStatus;
use crate::services::directory_service::UpdateUserRequest;
use crate::services::{CurrentUser, UserProfile};

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: UserStatus,
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    let users = state.directory_service().list_users(&caller).await?;
    Ok(Json(ApiResponse::success(users)))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let user = state.directory_service().get_user(&caller, id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// GET /users/department/{name}
pub async fn list_department(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(department): Path<String>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    let users = state
        .directory_service()
        .list_department(&caller, &department)
        .await?;
    Ok(Json(ApiResponse::success(users)))
}

/// GET /users/{id}/reports
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    let users = state.directory_service().list_reports(&caller, id).await?;
    Ok(Json(ApiResponse::success(users)))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let user = state
        .directory_service()
        .update_user(&caller, id, payload)
        .await?;
    Ok(Json(ApiResponse::success(user)))
}

/// PUT /users/{id}/status
pub async fn set_status(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let user = state
        .directory_service()
        .set_status(&caller, id, payload.status)
        .await?;
    Ok(Json(ApiResponse::success(user)))
}
