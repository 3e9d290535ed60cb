//! Export pipeline: rasterized PDF, structured RTF, and share links.
//!
//! Every path reads a snapshot of the document (or its preview tree) and never mutates it.
//! Long-running exports go through [`gate::ExportGate`] so a second trigger of the same
//! kind supersedes the first instead of racing it.

pub mod gate;
pub mod handlers;
pub mod notification;
pub mod pdf;
pub mod raster;
pub mod rtf;
pub mod share;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gate::ExportGate;
pub use notification::Notification;
pub use raster::{LayoutRasterizer, RasterError, Rasterizer};
pub use share::{MemoryClipboard, NoShareSheet, ShareSheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Pdf,
    Word,
    Share,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Word => "word",
            ExportKind::Share => "share",
        }
    }

    pub fn success_notification(&self) -> Notification {
        match self {
            ExportKind::Pdf => {
                Notification::success("PDF Downloaded", "Your resume has been downloaded as PDF")
            }
            ExportKind::Word => Notification::success(
                "Word Document Downloaded",
                "Your resume has been downloaded as RTF (compatible with Word)",
            ),
            ExportKind::Share => {
                Notification::success("Link Copied", "Resume link copied to clipboard")
            }
        }
    }
}

/// A finished download.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Bytes,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Preview anchor '{0}' not found")]
    AnchorNotFound(String),

    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Share failed: {0}")]
    ShareFailed(String),

    #[error("Superseded by a newer export of the same kind")]
    Superseded,

    #[error("Export task failed: {0}")]
    Task(String),
}

impl ExportError {
    /// Failure toast for an export of `kind`.
    pub fn notification(&self, kind: ExportKind) -> Notification {
        match (self, kind) {
            (ExportError::ShareFailed(_), _) | (_, ExportKind::Share) => {
                Notification::failure("Share Failed", "Failed to share resume link")
            }
            (_, ExportKind::Pdf) => {
                Notification::failure("Export Failed", "Failed to export PDF. Please try again.")
            }
            (_, ExportKind::Word) => Notification::failure(
                "Export Failed",
                "Failed to export Word document. Please try again.",
            ),
        }
    }
}

impl From<RasterError> for ExportError {
    fn from(err: RasterError) -> Self {
        match err {
            RasterError::AnchorNotFound(anchor) => ExportError::AnchorNotFound(anchor),
            other => ExportError::Rasterize(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::notification::NotificationVariant;

    #[test]
    fn test_failure_wording_per_kind() {
        let err = ExportError::Encode("boom".into());
        assert_eq!(err.notification(ExportKind::Pdf).description, "Failed to export PDF. Please try again.");
        assert_eq!(err.notification(ExportKind::Word).title, "Export Failed");
        assert_eq!(
            err.notification(ExportKind::Word).variant,
            NotificationVariant::Destructive
        );
        assert_eq!(
            ExportError::ShareFailed("denied".into()).notification(ExportKind::Share).title,
            "Share Failed"
        );
    }

    #[test]
    fn test_raster_anchor_error_maps_through() {
        let err: ExportError = RasterError::AnchorNotFound("resume-preview".into()).into();
        assert!(matches!(err, ExportError::AnchorNotFound(a) if a == "resume-preview"));
        let err: ExportError = RasterError::InvalidScale(0.0).into();
        assert!(matches!(err, ExportError::Rasterize(_)));
    }

    #[test]
    fn test_success_titles() {
        assert_eq!(ExportKind::Pdf.success_notification().title, "PDF Downloaded");
        assert_eq!(ExportKind::Share.success_notification().title, "Link Copied");
        assert_eq!(
            ExportKind::Word.success_notification().variant,
            NotificationVariant::Default
        );
    }
}
