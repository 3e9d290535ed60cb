//! One editing session: the document, the signed-in user, pending AI suggestions, and
//! the per-kind export gate.
//!
//! The session owns its document outright. Mutations run under the session lock and are
//! applied in arrival order; exports and AI calls work on snapshots taken under the lock
//! and never hold it while they run.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

use crate::assistant::{accept, AcceptOutcome, Suggestion};
use crate::document::{DocumentModel, Mutation, MutationOutcome};
use crate::export::{ExportGate, MemoryClipboard};
use crate::models::resume::ResumeDocument;
use crate::models::template::{TemplateError, TemplateId};
use crate::models::user::CurrentUser;
use crate::render::{render, PreviewTree};

pub const DEFAULT_RESUME_NAME: &str = "Software Engineer Resume";

pub struct SessionState {
    pub resume_name: String,
    pub user: Option<CurrentUser>,
    pub model: DocumentModel,
    suggestions: HashMap<Uuid, Suggestion>,
}

pub struct EditorSession {
    pub id: Uuid,
    /// Caller-facing resume identity, used by share links and the persistence port.
    pub resume_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub exports: ExportGate,
    pub clipboard: MemoryClipboard,
    state: Mutex<SessionState>,
}

/// Read-only view returned to the editor after every change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub resume_id: Uuid,
    pub resume_name: String,
    pub created_at: DateTime<Utc>,
    pub revision: u64,
    pub user: Option<CurrentUser>,
    pub document: ResumeDocument,
    pub preview: PreviewTree,
}

impl EditorSession {
    /// Starts a session on the seed document.
    pub fn new(user: Option<CurrentUser>) -> Self {
        Self::with_document(user, Uuid::new_v4(), ResumeDocument::seed())
    }

    pub fn with_document(user: Option<CurrentUser>, resume_id: Uuid, doc: ResumeDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            resume_id,
            created_at: Utc::now(),
            exports: ExportGate::new(),
            clipboard: MemoryClipboard::default(),
            state: Mutex::new(SessionState {
                resume_name: DEFAULT_RESUME_NAME.to_string(),
                user,
                model: DocumentModel::new(doc),
                suggestions: HashMap::new(),
            }),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock().await;
        self.snapshot_of(&state)
    }

    fn snapshot_of(&self, state: &SessionState) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            resume_id: self.resume_id,
            resume_name: state.resume_name.clone(),
            created_at: self.created_at,
            revision: state.model.revision(),
            user: state.user.clone(),
            document: state.model.read().clone(),
            preview: render(state.model.read()),
        }
    }

    pub async fn document(&self) -> ResumeDocument {
        self.lock().await.model.read().clone()
    }

    pub async fn preview(&self) -> PreviewTree {
        render(self.lock().await.model.read())
    }

    pub async fn resume_name(&self) -> String {
        self.lock().await.resume_name.clone()
    }

    pub async fn apply(&self, mutation: Mutation) -> (MutationOutcome, SessionSnapshot) {
        let mut state = self.lock().await;
        let outcome = state.model.apply(mutation);
        (outcome, self.snapshot_of(&state))
    }

    /// Selects a template by id. Unknown ids are rejected and leave the document as is.
    pub async fn select_template(&self, raw: &str) -> Result<SessionSnapshot, TemplateError> {
        let template_id: TemplateId = raw.parse()?;
        let mut state = self.lock().await;
        state.model.set_template(template_id);
        info!(session = %self.id, template = template_id.as_str(), "Template selected");
        Ok(self.snapshot_of(&state))
    }

    pub async fn rename(&self, name: &str) -> SessionSnapshot {
        let mut state = self.lock().await;
        state.resume_name = name.trim().to_string();
        self.snapshot_of(&state)
    }

    /// Swaps in a loaded document.
    pub async fn replace_document(&self, doc: ResumeDocument) -> SessionSnapshot {
        let mut state = self.lock().await;
        state.model.replace(doc);
        state.suggestions.clear();
        self.snapshot_of(&state)
    }

    pub async fn set_user(&self, user: Option<CurrentUser>) {
        self.lock().await.user = user;
    }

    /// Holds `suggestion` for accept/dismiss. A newer suggestion for the same target
    /// replaces the pending one.
    pub async fn hold_suggestion(&self, suggestion: Suggestion) {
        debug!(session = %self.id, suggestion = %suggestion.id, "Holding suggestion");
        let mut state = self.lock().await;
        state.suggestions.retain(|_, held| held.target != suggestion.target);
        state.suggestions.insert(suggestion.id, suggestion);
    }

    /// Accepts a held suggestion. `None` if the id is unknown or was already used.
    pub async fn accept_suggestion(
        &self,
        suggestion_id: Uuid,
    ) -> Option<(AcceptOutcome, SessionSnapshot)> {
        let mut state = self.lock().await;
        let suggestion = state.suggestions.remove(&suggestion_id)?;
        let outcome = accept(&mut state.model, &suggestion);
        Some((outcome, self.snapshot_of(&state)))
    }

    pub async fn dismiss_suggestion(&self, suggestion_id: Uuid) -> bool {
        self.lock()
            .await
            .suggestions
            .remove(&suggestion_id)
            .is_some()
    }
}
