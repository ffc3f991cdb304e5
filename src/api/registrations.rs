use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse, PendingCountResponse};
use crate::entities::enums::RegistrationStatus;
use crate::entities::pending_registrations;
use crate::services::{ApplyRequest, CurrentUser, UserProfile};

#[derive(Debug, Default, Deserialize)]
pub struct RejectRegistrationRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /registrations/apply (unauthenticated)
pub async fn apply(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ApplyRequest>,
) -> Result<Json<ApiResponse<pending_registrations::Model>>, ApiError> {
    let registration = state.registration_service().apply(payload).await?;
    Ok(Json(ApiResponse::success(registration)))
}

/// GET /registrations/pending
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<pending_registrations::Model>>>, ApiError> {
    let registrations = state.registration_service().list_pending(&caller).await?;
    Ok(Json(ApiResponse::success(registrations)))
}

/// GET /registrations
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<pending_registrations::Model>>>, ApiError> {
    let registrations = state.registration_service().list_all(&caller).await?;
    Ok(Json(ApiResponse::success(registrations)))
}

/// GET /registrations/approved
pub async fn list_approved(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<pending_registrations::Model>>>, ApiError> {
    let registrations = state
        .registration_service()
        .list_by_status(&caller, RegistrationStatus::Approved)
        .await?;
    Ok(Json(ApiResponse::success(registrations)))
}

/// GET /registrations/rejected
pub async fn list_rejected(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<pending_registrations::Model>>>, ApiError> {
    let registrations = state
        .registration_service()
        .list_by_status(&caller, RegistrationStatus::Rejected)
        .await?;
    Ok(Json(ApiResponse::success(registrations)))
}

/// GET /registrations/pending/count
pub async fn pending_count(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<PendingCountResponse>>, ApiError> {
    let pending = state.registration_service().pending_count(&caller).await?;
    Ok(Json(ApiResponse::success(PendingCountResponse { pending })))
}

/// POST /registrations/{id}/approve
pub async fn approve(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let user = state.registration_service().approve(&caller, id).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// POST /registrations/{id}/reject
pub async fn reject(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<RejectRegistrationRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .registration_service()
        .reject(&caller, id, payload.reason)
        .await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Registration {id} rejected"),
    })))
}

/// DELETE /registrations/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.registration_service().delete(&caller, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Registration {id} deleted"),
    })))
}
