use std::sync::Arc;

use streambot_agent::{FallbackDispatcher, GeminiClient};
use streambot_core::config::{AppConfig, ConfigError};
use streambot_core::{MemorySessionStore, OrderFlow};
use thiserror::Error;
use tracing::info;

use crate::chat::{self, ChatState};
use crate::health;

pub struct Application {
    pub config: AppConfig,
    pub router: axum::Router,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("completion client initialization failed: {0}")]
    CompletionClient(anyhow::Error),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let api_key = config
        .llm
        .api_key
        .clone()
        .ok_or_else(|| ConfigError::Validation("llm.api_key is required".to_string()))?;

    let client =
        GeminiClient::new(config.llm.base_url.clone(), api_key, config.llm.timeout_secs)
            .map_err(BootstrapError::CompletionClient)?;
    let dispatcher = Arc::new(FallbackDispatcher::new(Arc::new(client)));

    let chat_state = ChatState {
        flow: Arc::new(OrderFlow::default()),
        dispatcher: dispatcher.clone(),
        sessions: Arc::new(MemorySessionStore::new()),
    };

    info!(
        event_name = "system.bootstrap.ready",
        bind_address = %config.server.bind_address,
        port = config.server.port,
        "application wired"
    );

    let router = chat::router(chat_state).merge(health::router(dispatcher));
    Ok(Application { config, router })
}
