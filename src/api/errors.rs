//! Application error taxonomy built on thiserror.

use actix_web::{HttpResponse, ResponseError};
use std::error::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Storage failure with the failing operation attached. The engine
    /// message is kept in the source chain for the logs and never sent
    /// to the client.
    #[error("database error in operation '{operation}': {source}")]
    Database {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    /// Malformed or missing input, surfaced to the caller verbatim.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps a storage failure with the operation that issued it.
    pub fn database(operation: &str, source: sqlx::Error) -> Self {
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Database { operation, source } => {
                tracing::error!(
                    operation = %operation,
                    error = %source,
                    error_chain = ?source.source(),
                    "database error"
                );
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "database error".to_string(),
                    message: "internal server error".to_string(),
                })
            }
            Self::Validation(message) => {
                tracing::warn!(message = %message, "validation error");
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "validation error".to_string(),
                    message: message.clone(),
                })
            }
            Self::Unauthorized(message) => {
                tracing::warn!(message = %message, "unauthorized request");
                HttpResponse::Unauthorized().json(ErrorResponse {
                    error: "unauthorized".to_string(),
                    message: message.clone(),
                })
            }
            Self::NotFound(message) => {
                tracing::info!(message = %message, "resource not found");
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "not found".to_string(),
                    message: message.clone(),
                })
            }
            Self::Conflict(message) => {
                tracing::warn!(message = %message, "conflict");
                HttpResponse::Conflict().json(ErrorResponse {
                    error: "conflict".to_string(),
                    message: message.clone(),
                })
            }
            Self::Internal(message) => {
                tracing::error!(message = %message, "internal error");
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "internal error".to_string(),
                    message: "internal server error".to_string(),
                })
            }
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database {
            operation: "database_operation".to_string(),
            source: error,
        }
    }
}
