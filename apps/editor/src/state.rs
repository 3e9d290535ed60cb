use std::sync::Arc;

use crate::assistant::AiAssistant;
use crate::config::Config;
use crate::document::ResumeStore;
use crate::export::{Rasterizer, ShareSheet};
use crate::session::{SessionRegistry, StatsTicker};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    pub store: Arc<dyn ResumeStore>,
    pub assistant: AiAssistant,
    /// Pluggable rasterizer. Default: LayoutRasterizer.
    pub rasterizer: Arc<dyn Rasterizer>,
    pub share_sheet: Arc<dyn ShareSheet>,
    pub stats: Arc<StatsTicker>,
    pub config: Config,
}
