// HTTP error mapping
use crate::application::error::TrendServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unsupported time range: {0}h (expected one of 1, 4, 8, 12, 24)")]
    UnsupportedRange(u32),

    #[error(transparent)]
    Service(#[from] TrendServiceError),

    #[error("failed to build response")]
    Response(StatusCode),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedRange(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(TrendServiceError::AssetNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(TrendServiceError::Storage(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Service(TrendServiceError::Report(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Response(status) => *status,
        }
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        ApiError::Response(status)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let message = match &self {
            ApiError::Service(TrendServiceError::Storage(_)) => "storage unavailable".to_string(),
            other => other.to_string(),
        };
        (status, message).into_response()
    }
}
