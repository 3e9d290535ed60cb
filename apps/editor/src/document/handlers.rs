use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::document::{Mutation, MutationOutcome};
use crate::errors::AppError;
use crate::models::template::{catalogue, TemplateInfo};
use crate::session::handlers::find_session;
use crate::session::{DashboardStats, SessionSnapshot};
use crate::state::AppState;

#[derive(Serialize)]
pub struct MutationResponse {
    pub outcome: MutationOutcome,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectTemplateRequest {
    pub template_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub resume_id: Uuid,
    pub revision: u64,
    pub saved_at: DateTime<Utc>,
}

/// POST /api/v1/sessions/:id/mutations
pub async fn handle_apply_mutation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mutation): Json<Mutation>,
) -> Result<Json<MutationResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let (outcome, snapshot) = session.apply(mutation).await;
    Ok(Json(MutationResponse { outcome, snapshot }))
}

/// PUT /api/v1/sessions/:id/template
pub async fn handle_select_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectTemplateRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.select_template(&req.template_id).await?))
}

/// POST /api/v1/sessions/:id/save
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let (doc, revision) = {
        let guard = session.lock().await;
        (guard.model.read().clone(), guard.model.revision())
    };
    let created = state.store.save(session.resume_id, &doc).await?;
    if created {
        state.stats.update(DashboardStats::record_created);
    }
    info!(session = %id, resume = %session.resume_id, revision, created, "Resume saved");
    Ok(Json(SaveResponse {
        resume_id: session.resume_id,
        revision,
        saved_at: Utc::now(),
    }))
}

/// POST /api/v1/sessions/:id/load
pub async fn handle_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    let doc = state.store.load(session.resume_id).await?;
    info!(session = %id, resume = %session.resume_id, "Resume loaded");
    Ok(Json(session.replace_document(doc).await))
}

/// DELETE /api/v1/sessions/:id/resume
///
/// Removes the saved copy. The session keeps its working document.
pub async fn handle_delete_saved(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id).await?;
    state.store.delete(session.resume_id).await?;
    state.stats.update(DashboardStats::record_deleted);
    info!(session = %id, resume = %session.resume_id, "Saved resume deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(catalogue())
}
