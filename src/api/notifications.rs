use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse, UnreadCountResponse};
use crate::entities::notifications;
use crate::services::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: i32,
    pub kind: String,
    pub message: String,
}

/// POST /notifications
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .notification_service()
        .create(&caller, payload.user_id, &payload.kind, &payload.message)
        .await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Notification sent".to_string(),
    })))
}

/// GET /notifications
pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<notifications::Model>>>, ApiError> {
    let notifications = state.notification_service().list_mine(&caller).await?;
    Ok(Json(ApiResponse::success(notifications)))
}

/// GET /notifications/unread
pub async fn list_unread(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<notifications::Model>>>, ApiError> {
    let notifications = state.notification_service().list_unread(&caller).await?;
    Ok(Json(ApiResponse::success(notifications)))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, ApiError> {
    let unread = state.notification_service().unread_count(&caller).await?;
    Ok(Json(ApiResponse::success(UnreadCountResponse { unread })))
}

/// POST /notifications/{id}/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notification_service().mark_read(&caller, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Notification {id} acknowledged"),
    })))
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notification_service().mark_all_read(&caller).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: "All notifications acknowledged".to_string(),
    })))
}
