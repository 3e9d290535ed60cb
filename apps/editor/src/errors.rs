use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::assistant::{AssistantCall, AssistantError};
use crate::document::store::StoreError;
use crate::export::{ExportError, ExportKind, Notification};
use crate::models::template::TemplateError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Export failed: {source}")]
    Export {
        kind: ExportKind,
        source: ExportError,
    },

    #[error("Assistant error: {source}")]
    Assistant {
        call: AssistantCall,
        source: AssistantError,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn export(kind: ExportKind) -> impl FnOnce(ExportError) -> AppError {
        move |source| AppError::Export { kind, source }
    }

    pub fn assistant(call: AssistantCall) -> impl FnOnce(AssistantError) -> AppError {
        move |source| AppError::Assistant { call, source }
    }

    pub fn session_not_found(id: uuid::Uuid) -> AppError {
        AppError::NotFound(format!("Session {id} not found"))
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("Resume {id} not found")),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut notification: Option<Notification> = None;

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Export {
                source: ExportError::Superseded,
                ..
            } => (
                StatusCode::CONFLICT,
                "EXPORT_SUPERSEDED",
                "A newer export of the same kind replaced this one".to_string(),
            ),
            AppError::Export { kind, source } => {
                tracing::warn!(kind = kind.as_str(), "Export failed: {source}");
                notification = Some(source.notification(*kind));
                let code = match source {
                    ExportError::ShareFailed(_) => "SHARE_FAILED",
                    _ => "EXPORT_FAILED",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, code, source.to_string())
            }
            AppError::Assistant { call, source } => match source {
                AssistantError::EmptyInput => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    source.to_string(),
                ),
                AssistantError::InputTooLong { .. } => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "INPUT_TOO_LONG",
                    source.to_string(),
                ),
                AssistantError::AIRequestFailed(e) => {
                    tracing::error!("AI request failed: {e}");
                    notification = Some(source.notification(*call));
                    (
                        StatusCode::BAD_GATEWAY,
                        "AI_REQUEST_FAILED",
                        source.apology(*call).to_string(),
                    )
                }
            },
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        if let Some(notification) = notification {
            body["notification"] = json!(notification);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::export(ExportKind::Pdf)(ExportError::Superseded),
                StatusCode::CONFLICT,
            ),
            (
                AppError::export(ExportKind::Word)(ExportError::Encode("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::assistant(AssistantCall::Chat)(AssistantError::EmptyInput),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::assistant(AssistantCall::Improve)(AssistantError::AIRequestFailed(
                    LlmError::EmptyContent,
                )),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_unknown_template_is_validation() {
        let err: AppError = TemplateError::Unknown("neon".into()).into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
