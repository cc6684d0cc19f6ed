//! API error type with `IntoResponse`
//!
//! Every failure leaves the server as `{"detail": ...}` with a matching status.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::schema::ErrorDetail;

pub const NOT_FOUND_DETAIL: &str = "Despesa não encontrada";
const INTERNAL_DETAIL: &str = "Internal Server Error";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or mistyped input (422, or the rejection's own status)
    #[error("{message}")]
    Validation { status: StatusCode, message: String },

    /// No expense with the requested id (404)
    #[error("Despesa não encontrada")]
    NotFound,

    /// Storage failure (500, logged)
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    /// Blocking task died before finishing (500, logged)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { status, .. } => *status,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            Self::Storage(_) | Self::Internal(_) => {
                // Log the real cause, hand the client a generic message
                tracing::error!("{}", self);
                INTERNAL_DETAIL.to_string()
            }
            Self::NotFound => NOT_FOUND_DETAIL.to_string(),
            Self::Validation { message, .. } => message.clone(),
        };

        (status, Json(ErrorDetail { detail })).into_response()
    }
}

// Extractor rejections keep their status (400 syntax, 415 content type,
// 422 data) but use our body shape.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
