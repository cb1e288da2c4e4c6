// Video API routes
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tracing::warn;

use crate::{
    controllers::{DownloadController, InfoController},
    error::ApiError,
    models::video::{DownloadQuery, InfoQuery},
    state::AppState,
};

fn malformed_query(rejection: QueryRejection) -> ApiError {
    warn!("Rejected query string: {}", rejection.body_text());
    ApiError::InvalidInput("Malformed query string".to_string())
}

/// GET /api/info - Metadata and combined formats for a video link
pub async fn info_route(
    State(state): State<AppState>,
    query: Result<Query<InfoQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(q) => q,
        Err(rejection) => return malformed_query(rejection).into_response(),
    };

    match InfoController::get_info(state.extractor.as_ref(), params.url.as_deref()).await {
        Ok(metadata) => Json(metadata).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/download - Stream the chosen encoding as an attachment
pub async fn download_route(
    State(state): State<AppState>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(q) => q,
        Err(rejection) => return malformed_query(rejection).into_response(),
    };

    DownloadController::download(
        state.extractor.as_ref(),
        params.url.as_deref(),
        params.itag.as_deref(),
    )
    .await
    .unwrap_or_else(IntoResponse::into_response)
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/info", get(info_route))
        .route("/download", get(download_route))
}
