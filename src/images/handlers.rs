use axum::{
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{auth::extractors::BearerToken, error::ApiError, state::AppState};

use super::services::{upload_image, UploadItem};

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

pub(crate) const UPLOAD_LIMIT: usize = 20 * 1024 * 1024; // 20MB

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
}

/// POST /upload: the body is the raw image; it is not kept.
#[instrument(skip(state, _token, headers, body))]
pub async fn upload(
    State(state): State<AppState>,
    _token: BearerToken,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let body = body?;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let url = upload_image(&state, UploadItem { body, content_type }).await?;
    Ok(Json(UploadResponse { url }))
}
