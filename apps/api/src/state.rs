use std::sync::Arc;

use crate::config::Config;
use crate::export::PageConfig;
use crate::llm_client::LlmProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Chosen once at startup: OpenAI when a key is configured, offline otherwise.
    pub llm: Arc<dyn LlmProvider>,
    /// Page geometry for PDF export.
    pub page_config: PageConfig,
}
