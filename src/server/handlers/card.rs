//! Card preview and export handlers.

use axum::{
    Json,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

use super::super::state::AppState;
use super::http_error;
use crate::card::CardConfig;
use crate::card::layout::realize;
use crate::export::{self, CaptureOptions};

/// POST /api/card/preview - Render a config as a screen-resolution PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(config): Json<CardConfig>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let png = render_png(&state, &config, CaptureOptions { quality: 1.0, pixel_ratio: 1 })
        .await?
        .png;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// POST /api/card/export - Render a config at export resolution, served as
/// a timestamped download.
pub async fn export(
    State(state): State<Arc<AppState>>,
    Json(config): Json<CardConfig>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let artifact = render_png(&state, &config, CaptureOptions::default()).await?;
    println!("[export] Captured {}", artifact.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.png,
    ))
}

async fn render_png(
    state: &AppState,
    config: &CardConfig,
    options: CaptureOptions,
) -> Result<export::Artifact, (StatusCode, String)> {
    let spec = realize(config, &state.catalog).map_err(http_error)?;

    let mut exporter = state.exporter.write().await;
    export::resolve_background(&spec, exporter.rasterizer_mut(), &state.http_client)
        .await
        .map_err(http_error)?;
    exporter.capture(&spec, &options).map_err(http_error)
}

/// Response for a background upload: the source key to put in a config's
/// `customBackgroundImage` field.
#[derive(Serialize)]
pub struct UploadResponse {
    pub source: String,
}

/// PUT /api/card/background - Upload a background image.
///
/// Expects a multipart form with an `image` field; the decoded image is
/// cached in the rasterizer under the returned source key.
pub async fn upload_background(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut filename = String::from("upload");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("image") {
            if let Some(name) = field.file_name() {
                filename = name.to_string();
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read image: {}", e)))?;
            image_data = Some(bytes.to_vec());
        }
    }

    let Some(bytes) = image_data else {
        return Err((StatusCode::BAD_REQUEST, "Missing image field".to_string()));
    };

    let mut exporter = state.exporter.write().await;
    let source = export::register_upload(exporter.rasterizer_mut(), &filename, &bytes)
        .map_err(http_error)?;
    println!("[upload] Registered background {source:?}");
    Ok(Json(UploadResponse { source }))
}
