use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LanguageModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data: result history lives with the caller.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Default: GeminiClient.
    pub llm: Arc<dyn LanguageModel>,
    pub config: Config,
}
