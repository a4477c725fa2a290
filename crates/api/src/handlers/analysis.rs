//! Handlers for the two analysis endpoints.
//!
//! Both accept `multipart/form-data` with a single `image` field, validate
//! it locally, forward it to the vision gateway and return the normalized
//! envelope.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use skinsight_core::hashing::short_digest;
use skinsight_core::types::AnalysisMode;
use skinsight_core::upload::validate_image;

use crate::error::{AppError, AppResult};
use crate::response::AnalysisResponse;
use crate::state::AppState;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// One uploaded file part.
struct ImageUpload {
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// POST /api/analyze
///
/// Comprehensive face detection: skin status plus demographics, emotion,
/// beauty and the detection detail sections.
pub async fn analyze_basic(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalysisResponse>> {
    run_analysis(&state, multipart, AnalysisMode::Basic).await
}

/// POST /api/skin-analyze
///
/// Dedicated skin analysis: per-attribute flags, categories and skin type.
pub async fn analyze_advanced(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalysisResponse>> {
    run_analysis(&state, multipart, AnalysisMode::Advanced).await
}

async fn run_analysis(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    mode: AnalysisMode,
) -> AppResult<Json<AnalysisResponse>> {
    // Non-multipart bodies still get the JSON error shape.
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let upload = read_image(multipart).await?;

    let format = validate_image(
        upload.as_ref().map(|u| u.bytes.as_slice()),
        upload.as_ref().and_then(|u| u.content_type.as_deref()),
    )
    .inspect_err(|e| tracing::debug!(mode = mode.as_str(), error = %e, "Rejected upload"))?;

    // Validation guarantees the upload is present.
    let bytes = upload.map(|u| u.bytes).unwrap_or_default();

    tracing::info!(
        mode = mode.as_str(),
        format = format.mime(),
        bytes = bytes.len(),
        digest = %short_digest(&bytes),
        "Accepted image for analysis"
    );

    let raw = state.gateway.analyze(&bytes, mode).await?;
    let envelope = skinsight_core::analyze(&raw, mode);

    tracing::info!(
        mode = mode.as_str(),
        health_score = envelope.health_score,
        recommendations = envelope.recommendations.len(),
        warnings = envelope.warnings.len(),
        "Analysis complete"
    );

    Ok(Json(AnalysisResponse::new(envelope)))
}

/// Pull the `image` part out of the form. Other fields are ignored; a
/// repeated `image` field keeps the first.
async fn read_image(mut multipart: Multipart) -> AppResult<Option<ImageUpload>> {
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) || upload.is_some() {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some(ImageUpload {
            content_type,
            bytes: data.to_vec(),
        });
    }

    Ok(upload)
}
