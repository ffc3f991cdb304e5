use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{
    AuthError, DirectoryError, NotificationError, ProductivityError, RegistrationError, TaskError,
    TimeLogError,
};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    Conflict(String),

    InternalError(String),

    Unauthorized(String),

    Forbidden(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound => ApiError::NotFound(err.to_string()),
            TaskError::AssigneeNotFound | TaskError::Validation(_) => {
                ApiError::ValidationError(err.to_string())
            }
            TaskError::Forbidden(msg) => ApiError::Forbidden(msg),
            TaskError::InvalidTransition(_) => ApiError::Conflict(err.to_string()),
            TaskError::Database(msg) => ApiError::DatabaseError(msg),
            TaskError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<TimeLogError> for ApiError {
    fn from(err: TimeLogError) -> Self {
        match err {
            TimeLogError::NotFound => ApiError::NotFound(err.to_string()),
            TimeLogError::Conflict | TimeLogError::Immutable => {
                ApiError::Conflict(err.to_string())
            }
            TimeLogError::Forbidden(msg) => ApiError::Forbidden(msg),
            TimeLogError::Validation(msg) => ApiError::ValidationError(msg),
            TimeLogError::Database(msg) => ApiError::DatabaseError(msg),
            TimeLogError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::NotFound => ApiError::NotFound(err.to_string()),
            RegistrationError::EmailTaken
            | RegistrationError::AlreadyApplied
            | RegistrationError::AlreadyProcessed => ApiError::Conflict(err.to_string()),
            RegistrationError::Forbidden(msg) => ApiError::Forbidden(msg),
            RegistrationError::Validation(msg) => ApiError::ValidationError(msg),
            RegistrationError::Database(msg) => ApiError::DatabaseError(msg),
            RegistrationError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ProductivityError> for ApiError {
    fn from(err: ProductivityError) -> Self {
        match err {
            ProductivityError::UserNotFound | ProductivityError::EmptyDepartment(_) => {
                ApiError::NotFound(err.to_string())
            }
            ProductivityError::Forbidden(msg) => ApiError::Forbidden(msg),
            ProductivityError::Validation(msg) => ApiError::ValidationError(msg),
            ProductivityError::Database(msg) => ApiError::DatabaseError(msg),
            ProductivityError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::NotFound | NotificationError::UserNotFound => {
                ApiError::NotFound(err.to_string())
            }
            NotificationError::Forbidden(msg) => ApiError::Forbidden(msg),
            NotificationError::Validation(msg) => ApiError::ValidationError(msg),
            NotificationError::Database(msg) => ApiError::DatabaseError(msg),
            NotificationError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::Inactive => ApiError::Forbidden(err.to_string()),
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::UserNotFound => ApiError::NotFound(err.to_string()),
            DirectoryError::Forbidden(msg) => ApiError::Forbidden(msg),
            DirectoryError::Validation(msg) => ApiError::ValidationError(msg),
            DirectoryError::Database(msg) => ApiError::DatabaseError(msg),
            DirectoryError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
