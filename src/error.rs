use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Failures surfaced by the API; upstream detail never reaches the body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Failed to fetch video info. YouTube might be blocking the request.")]
    UpstreamFetchFailed,

    #[error("Download failed")]
    DownloadFailed,
}

impl ApiError {
    pub fn url_required() -> Self {
        ApiError::InvalidInput("URL is required".to_string())
    }

    pub fn invalid_url() -> Self {
        ApiError::InvalidInput("Invalid YouTube URL".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamFetchFailed | ApiError::DownloadFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({"error": self.to_string()})),
        )
            .into_response()
    }
}
