use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::MessageResponse;

/// RepoError
///
/// Faults raised by a `Repository` implementation. Every variant means the storage
/// layer could not answer; "row absent" is never an error here (see `WriteOutcome`).
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("in-memory store unavailable")]
    Unavailable,
    #[error("identity sequence exhausted for table {0}")]
    IdsExhausted(&'static str),
}

/// WriteOutcome
///
/// Result of an update, soft delete or hard delete that reached the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A row matched and the statement was applied.
    Applied,
    /// No row matched the id.
    NotFound,
}

impl WriteOutcome {
    pub fn applied(self) -> bool {
        matches!(self, WriteOutcome::Applied)
    }
}

/// ServiceError
///
/// The three failure kinds the business layer surfaces. Each maps onto exactly one
/// HTTP status in `into_response`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: i32 },
    #[error("{context}")]
    ExternalService {
        context: String,
        #[source]
        source: RepoError,
    },
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: i32) -> Self {
        ServiceError::NotFound { resource, id }
    }

    pub fn external(context: impl Into<String>, source: RepoError) -> Self {
        ServiceError::ExternalService {
            context: context.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::ExternalService { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error bodies are always `{"message": "..."}`. For 500s the message is the service
/// context only; the wrapped database error stays in the logs.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = MessageResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
