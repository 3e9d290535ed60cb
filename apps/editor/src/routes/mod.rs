pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::assistant::handlers as ai;
use crate::document::handlers as document;
use crate::export::handlers as export;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_end_session),
        )
        .route("/api/v1/sessions/:id/name", put(session::handle_rename))
        .route("/api/v1/sessions/:id/user", put(session::handle_set_user))
        // Document
        .route(
            "/api/v1/sessions/:id/mutations",
            post(document::handle_apply_mutation),
        )
        .route(
            "/api/v1/sessions/:id/template",
            put(document::handle_select_template),
        )
        .route("/api/v1/sessions/:id/save", post(document::handle_save))
        .route("/api/v1/sessions/:id/load", post(document::handle_load))
        .route(
            "/api/v1/sessions/:id/resume",
            delete(document::handle_delete_saved),
        )
        .route("/api/v1/templates", get(document::handle_list_templates))
        // Export
        .route(
            "/api/v1/sessions/:id/export/pdf",
            post(export::handle_export_pdf),
        )
        .route(
            "/api/v1/sessions/:id/export/word",
            post(export::handle_export_word),
        )
        .route(
            "/api/v1/sessions/:id/export/share",
            post(export::handle_share),
        )
        // AI assistant
        .route("/api/v1/sessions/:id/ai/improve", post(ai::handle_improve))
        .route("/api/v1/sessions/:id/ai/accept", post(ai::handle_accept))
        .route("/api/v1/sessions/:id/ai/dismiss", post(ai::handle_dismiss))
        .route("/api/v1/sessions/:id/ai/chat", post(ai::handle_chat))
        .route("/api/v1/ai/ats", post(ai::handle_ats))
        // Dashboard
        .route(
            "/api/v1/dashboard/stats",
            get(session::handle_dashboard_stats),
        )
        .with_state(state)
}
