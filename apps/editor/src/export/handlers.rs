use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::share::{share_resume, ShareOutcome};
use crate::export::{pdf, rtf, Artifact, ExportKind, Notification};
use crate::session::handlers::find_session;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ShareResponse {
    #[serde(flatten)]
    pub outcome: ShareOutcome,
    pub notification: Option<Notification>,
}

/// POST /api/v1/sessions/:id/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = find_session(&state, id).await?;
    let preview = session.preview().await;
    let resume_name = session.resume_name().await;
    let rasterizer = Arc::clone(&state.rasterizer);
    let scale = state.config.raster_scale;

    let artifact = session
        .exports
        .run(ExportKind::Pdf, async move {
            pdf::export_pdf(&preview, rasterizer.as_ref(), scale, &resume_name).await
        })
        .await
        .map_err(AppError::export(ExportKind::Pdf))?;

    state.stats.update(|s| s.downloads += 1);
    Ok(download(artifact))
}

/// POST /api/v1/sessions/:id/export/word
pub async fn handle_export_word(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = find_session(&state, id).await?;
    let doc = session.document().await;

    let artifact = session
        .exports
        .run(ExportKind::Word, async move { Ok(rtf::export_word(&doc)) })
        .await
        .map_err(AppError::export(ExportKind::Word))?;

    state.stats.update(|s| s.downloads += 1);
    Ok(download(artifact))
}

/// POST /api/v1/sessions/:id/export/share
pub async fn handle_share(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let resume_name = session.resume_name().await;
    let origin = state.config.public_origin.clone();
    let sheet = Arc::clone(&state.share_sheet);
    let task_session = Arc::clone(&session);

    let outcome = session
        .exports
        .run(ExportKind::Share, async move {
            share_resume(
                &origin,
                task_session.resume_id,
                &resume_name,
                sheet.as_ref(),
                &task_session.clipboard,
            )
            .await
        })
        .await
        .map_err(AppError::export(ExportKind::Share))?;

    let notification = outcome.notification();
    Ok(Json(ShareResponse {
        outcome,
        notification,
    }))
}

fn download(artifact: Artifact) -> Response {
    // Header-safe filename: no quotes or control characters.
    let filename: String = artifact
        .filename
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    (
        [
            (header::CONTENT_TYPE, artifact.mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        artifact.bytes,
    )
        .into_response()
}
