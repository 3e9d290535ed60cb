//! Share-link export.
//!
//! Builds `<origin>/resume/<id>` and hands it to the native share sheet when one is
//! available, otherwise writes it to the clipboard.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::{ExportError, ExportKind, Notification};

pub const SHARE_TEXT: &str = "Check out my resume";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share channel unavailable")]
    Unavailable,

    #[error("share denied: {0}")]
    Denied(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[async_trait]
pub trait ShareSheet: Send + Sync {
    fn is_available(&self) -> bool;
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ShareError>;
}

/// Server-side stand-in: there is never a native share sheet.
pub struct NoShareSheet;

#[async_trait]
impl ShareSheet for NoShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _payload: &SharePayload) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}

/// Keeps the last copied text; the HTTP layer returns it to the client.
#[derive(Default)]
pub struct MemoryClipboard {
    last: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.last.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ShareError> {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareMethod {
    NativeSheet,
    Clipboard,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareOutcome {
    pub url: String,
    pub method: ShareMethod,
}

impl ShareOutcome {
    /// Clipboard copies are confirmed with a toast; the native sheet is its own feedback.
    pub fn notification(&self) -> Option<Notification> {
        match self.method {
            ShareMethod::Clipboard => Some(ExportKind::Share.success_notification()),
            ShareMethod::NativeSheet => None,
        }
    }
}

pub fn share_url(origin: &str, resume_id: Uuid) -> String {
    format!("{}/resume/{resume_id}", origin.trim_end_matches('/'))
}

/// Shares the resume link. A sheet that turns out unavailable falls back to the
/// clipboard; a denied share is reported as a failure.
pub async fn share_resume(
    origin: &str,
    resume_id: Uuid,
    resume_name: &str,
    sheet: &dyn ShareSheet,
    clipboard: &dyn Clipboard,
) -> Result<ShareOutcome, ExportError> {
    let url = share_url(origin, resume_id);

    if sheet.is_available() {
        let payload = SharePayload {
            title: resume_name.to_string(),
            text: SHARE_TEXT.to_string(),
            url: url.clone(),
        };
        match sheet.share(&payload).await {
            Ok(()) => {
                info!(%resume_id, "Resume shared via share sheet");
                return Ok(ShareOutcome {
                    url,
                    method: ShareMethod::NativeSheet,
                });
            }
            Err(ShareError::Unavailable) => {
                warn!(%resume_id, "Share sheet unavailable, falling back to clipboard");
            }
            Err(e) => return Err(ExportError::ShareFailed(e.to_string())),
        }
    }

    clipboard
        .write_text(&url)
        .await
        .map_err(|e| ExportError::ShareFailed(e.to_string()))?;
    info!(%resume_id, "Resume link copied to clipboard");
    Ok(ShareOutcome {
        url,
        method: ShareMethod::Clipboard,
    })
}
