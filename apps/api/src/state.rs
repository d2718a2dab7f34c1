use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::{CompletionBackend, LlmClient};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; every generation request then fails with 500.
    pub backend: Option<Arc<dyn CompletionBackend>>,
    /// Log the composed prompts on every request (`LOG_PROMPTS=1`).
    pub log_prompts: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let backend = config
            .openai_api_key
            .clone()
            .map(|key| Arc::new(LlmClient::new(key)) as Arc<dyn CompletionBackend>);

        Self {
            backend,
            log_prompts: config.log_prompts,
        }
    }
}
