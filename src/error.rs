use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::forms::{FieldErrors, SubmitError};

/// Local storage failure
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Malformed stored record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage quota of {quota} bytes exceeded")]
    QuotaExceeded { quota: usize },

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Credential store failure, displayed to the user as-is
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User with this email already exists")]
    DuplicateUser,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Registration failed. Please try again.")]
    RegistrationFailed(#[source] StorageError),

    #[error("Login failed. Please try again.")]
    LoginFailed(#[source] StorageError),
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Permission denied")]
    Forbidden,
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(errors) => AppError::Validation(errors),
            SubmitError::Rejected(e) => AppError::Auth(e),
        }
    }
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Auth(ref e) => match e {
                AuthError::DuplicateUser => (StatusCode::CONFLICT, e.to_string()),
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    (StatusCode::UNAUTHORIZED, e.to_string())
                }
                AuthError::RegistrationFailed(source) | AuthError::LoginFailed(source) => {
                    tracing::error!("Credential store error: {:?}", source);
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::TaskJoin(ref e) => {
                tracing::error!("Task join error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Validation(errors) => {
                let body = Json(json!({
                    "error": "Validation failed",
                    "errors": errors,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Permission denied".to_string()),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
