use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Message returned to clients for every 5xx failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("missing required params: proc, user, pass")]
    MissingParams,

    #[error("invalid proc")]
    InvalidProc,

    /// sqlcmd exited nonzero. Bad credentials and failed procedures are not told apart.
    #[error("auth or exec failed")]
    AuthOrExec,

    #[error("not found")]
    NotFound,

    #[error("sqlcmd not found in search path")]
    ClientNotFound,

    #[error("sqlcmd did not exit within {0:?}")]
    Timeout(Duration),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::MissingParams | ServiceError::InvalidProc => StatusCode::BAD_REQUEST,
            ServiceError::AuthOrExec => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::ClientNotFound | ServiceError::Timeout(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn internal() -> Self {
        Self {
            error: INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = if status.is_server_error() {
            error!(error = %self, "request failed");
            ErrorBody::internal()
        } else {
            ErrorBody {
                error: self.to_string(),
            }
        };

        (status, Json(body)).into_response()
    }
}
