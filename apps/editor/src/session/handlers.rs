use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::ExportKind;
use crate::models::user::CurrentUser;
use crate::session::{DashboardStats, EditorSession, SessionSnapshot};
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    pub user: Option<CurrentUser>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
    pub exports_in_flight: Vec<ExportKind>,
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct SetUserRequest {
    pub user: Option<CurrentUser>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: Option<CurrentUser>,
    pub initials: Option<String>,
}

pub async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<EditorSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::session_not_found(id))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    req: Option<Json<CreateSessionRequest>>,
) -> (StatusCode, Json<SessionResponse>) {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let session = state.sessions.create(req.user).await;
    let snapshot = session.snapshot().await;
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            snapshot,
            exports_in_flight: Vec::new(),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(SessionResponse {
        snapshot: session.snapshot().await,
        exports_in_flight: session.exports.in_flight(),
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.end(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::session_not_found(id))
    }
}

/// PUT /api/v1/sessions/:id/name
pub async fn handle_rename(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.rename(&req.name).await))
}

/// PUT /api/v1/sessions/:id/user
///
/// Called by the auth collaborator on session-changed events. `null` signs the user out.
pub async fn handle_set_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let initials = req.user.as_ref().map(CurrentUser::initials);
    session.set_user(req.user.clone()).await;
    Ok(Json(UserResponse {
        user: req.user,
        initials,
    }))
}

/// GET /api/v1/dashboard/stats
pub async fn handle_dashboard_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.stats.snapshot())
}
