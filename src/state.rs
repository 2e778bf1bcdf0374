//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::document::DocumentAssembler;
use crate::history::HistoryStore;
use crate::question::{GeminiClient, QuestionSource};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn QuestionSource>,
    pub assembler: Arc<DocumentAssembler>,
    pub history: Arc<HistoryStore>,
}

impl AppState {
    /// State backed by the Gemini REST API.
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .pool_idle_timeout(std::time::Duration::from_secs(900))
            .user_agent(concat!("quiz-doc-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let source = Arc::new(GeminiClient::new(http_client, &config));
        Self::with_source(config, source)
    }

    /// State with a caller-provided question source.
    pub fn with_source(
        config: AppConfig,
        source: Arc<dyn QuestionSource>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let assembler = DocumentAssembler::new(&config.generated_files_dir);
        assembler.ensure_output_dir()?;

        let history = HistoryStore::new(&config.history_file, &config.generated_files_dir);

        Ok(AppState {
            config: Arc::new(config),
            source,
            assembler: Arc::new(assembler),
            history: Arc::new(history),
        })
    }
}
