use std::sync::Arc;

use crate::config::ModelConfig;
use crate::llm_client::Gateway;
use crate::render::PageConfig;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Every stage calls out through this. Tests swap in a scripted double.
    pub gateway: Arc<dyn Gateway>,
    pub models: ModelConfig,
    /// Page geometry for the PDF download: A4 with 20 mm margins by default.
    pub page_config: PageConfig,
}
