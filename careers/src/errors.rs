use crate::db::errors::DbError;
use crate::types::Operation;
use crate::validation::FieldError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Caller's company does not own the resource
    #[error("Insufficient permissions to {action} {resource}")]
    InsufficientPermissions { action: Operation, resource: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// One or more request fields failed validation
    #[error("Validation failed: {} field error(s)", details.len())]
    Validation { details: Vec<FieldError> },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Conflicting state, e.g. a stale section version
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } | Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::InsufficientPermissions { action, resource } => format!("Not authorized to {action} {resource}"),
            Error::BadRequest { message } => message.clone(),
            Error::Validation { .. } => "Validation failed".to_string(),
            Error::NotFound { resource, .. } => format!("{resource} not found"),
            Error::Conflict { message } => message.clone(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { .. } => db_err.conflict_message().unwrap_or("Resource already exists").to_string(),
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Full detail goes to the log only, level by severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) | Error::Conflict { .. } => {
                tracing::warn!("Conflict or constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::InsufficientPermissions { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::Validation { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = ErrorBody {
            error: self.user_message(),
            details: match self {
                Error::Validation { details } => details,
                _ => Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: Error) -> (StatusCode, ErrorBody) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_body_lists_fields() {
        let (status, body) = body_of(Error::Validation {
            details: vec![FieldError::new("title", "title is required")],
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Validation failed");
        assert_eq!(body.details, vec![FieldError::new("title", "title is required")]);
    }

    #[tokio::test]
    async fn test_internal_errors_do_not_leak_detail() {
        let (status, body) = body_of(Error::Internal {
            operation: "reach password service at 10.0.0.3".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
        assert!(body.details.is_empty());

        let (status, body) = body_of(Error::Database(DbError::Other(anyhow::anyhow!("connection refused to 10.0.0.3")))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Database error occurred");
    }

    #[tokio::test]
    async fn test_slug_violation_is_conflict() {
        let (status, body) = body_of(Error::Database(DbError::UniqueViolation {
            constraint: Some("companies_slug_unique".to_string()),
            table: Some("companies".to_string()),
            message: "duplicate key value violates unique constraint".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, "A company with this slug already exists");
    }

    #[test]
    fn test_forbidden_message() {
        let err = Error::InsufficientPermissions {
            action: Operation::Update,
            resource: "section".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.user_message(), "Not authorized to update section");
    }
}
