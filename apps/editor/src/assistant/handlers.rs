use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assistant::{AcceptOutcome, AssistantCall, MatchReport, Suggestion, SuggestionTarget};
use crate::errors::AppError;
use crate::export::Notification;
use crate::render::to_plain_text;
use crate::session::handlers::find_session;
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ImproveRequest {
    pub target: SuggestionTarget,
    /// Defaults to the target's current text.
    pub text: Option<String>,
}

#[derive(Serialize)]
pub struct ImproveResponse {
    pub suggestion: Suggestion,
    pub notification: Notification,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptRequest {
    pub suggestion_id: Uuid,
}

#[derive(Serialize)]
pub struct AcceptResponse {
    pub outcome: AcceptOutcome,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub backend: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsRequest {
    pub job_description: String,
    pub resume_text: Option<String>,
    /// Used to flatten the session's preview when `resume_text` is absent.
    pub session_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct AtsResponse {
    pub report: MatchReport,
    pub notification: Notification,
}

/// POST /api/v1/sessions/:id/ai/improve
pub async fn handle_improve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ImproveRequest>,
) -> Result<Json<ImproveResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let text = match req.text {
        Some(text) => text,
        None => {
            let doc = session.document().await;
            req.target
                .current_text(&doc)
                .map(str::to_string)
                .ok_or_else(|| AppError::NotFound("Suggestion target not found".to_string()))?
        }
    };

    // The session lock is not held while the backend runs; edits continue meanwhile.
    let suggestion = state
        .assistant
        .improve(req.target, &text)
        .await
        .map_err(AppError::assistant(AssistantCall::Improve))?;
    session.hold_suggestion(suggestion.clone()).await;

    Ok(Json(ImproveResponse {
        suggestion,
        notification: Notification::success(
            "Content Improved",
            "Your content has been enhanced with AI suggestions.",
        ),
    }))
}

/// POST /api/v1/sessions/:id/ai/accept
pub async fn handle_accept(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AcceptRequest>,
) -> Result<Json<AcceptResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let (outcome, snapshot) = session
        .accept_suggestion(req.suggestion_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Suggestion {} not found", req.suggestion_id)))?;
    Ok(Json(AcceptResponse { outcome, snapshot }))
}

/// POST /api/v1/sessions/:id/ai/dismiss
pub async fn handle_dismiss(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AcceptRequest>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id).await?;
    if session.dismiss_suggestion(req.suggestion_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Suggestion {} not found",
            req.suggestion_id
        )))
    }
}

/// POST /api/v1/sessions/:id/ai/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    find_session(&state, id).await?;
    let reply = state
        .assistant
        .chat(&req.message)
        .await
        .map_err(AppError::assistant(AssistantCall::Chat))?;
    Ok(Json(ChatResponse {
        reply,
        backend: state.assistant.backend(),
    }))
}

/// POST /api/v1/ai/ats
pub async fn handle_ats(
    State(state): State<AppState>,
    Json(req): Json<AtsRequest>,
) -> Result<Json<AtsResponse>, AppError> {
    let resume_text = match (req.resume_text, req.session_id) {
        (Some(text), _) => text,
        (None, Some(session_id)) => {
            let session = find_session(&state, session_id).await?;
            to_plain_text(&session.preview().await)
        }
        (None, None) => {
            return Err(AppError::Validation(
                "Either resumeText or sessionId is required".to_string(),
            ))
        }
    };

    let report = state
        .assistant
        .analyze_match(&req.job_description, &resume_text)
        .await
        .map_err(AppError::assistant(AssistantCall::AnalyzeMatch))?;

    Ok(Json(AtsResponse {
        report,
        notification: MatchReport::notification(),
    }))
}
