//! Model-candidate fallback dispatcher: resolves a ranked candidate list once
//! per process, then walks it in order until a candidate produces usable
//! text.

use std::sync::Arc;

use anyhow::anyhow;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use streambot_core::ConversationMemory;

use crate::llm::{CompletionClient, GenerationParams};
use crate::prompt::build_prompt;

/// Candidate order used when the completion service cannot be asked for its
/// model list, or reports none that support generation.
const FALLBACK_MODELS: [&str; 6] = [
    "gemini-1.5-flash-8b-latest",
    "gemini-1.5-flash-8b",
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash-001",
    "gemini-1.5-pro-latest",
    "gemini-1.0-pro",
];

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The service refused the prompt. Terminal for this turn: remaining
    /// candidates are not attempted.
    #[error("AI blocked the request ({reason}). Try rephrasing.")]
    Blocked { reason: String },
    /// Every candidate was attempted without a usable result.
    #[error("{0}")]
    Exhausted(anyhow::Error),
}

/// Outcome of one generation attempt against one candidate model.
enum GenerationAttempt {
    Success(String),
    Blocked(String),
    /// Empty text without a block signal; skipped without being recorded.
    Empty,
    Failed(anyhow::Error),
}

pub struct FallbackDispatcher {
    client: Arc<dyn CompletionClient>,
    params: GenerationParams,
    candidates: OnceCell<Vec<String>>,
}

impl FallbackDispatcher {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_params(client, GenerationParams::default())
    }

    pub fn with_params(client: Arc<dyn CompletionClient>, params: GenerationParams) -> Self {
        Self { client, params, candidates: OnceCell::new() }
    }

    /// The resolved candidate list, if first use has already happened.
    pub fn cached_candidates(&self) -> Option<&[String]> {
        self.candidates.get().map(Vec::as_slice)
    }

    /// Ranked model identifiers, resolved on first use and cached for the
    /// process lifetime. Initialization is single-flight: concurrent first
    /// callers wait for one resolution.
    async fn candidates(&self) -> &[String] {
        self.candidates
            .get_or_init(|| async {
                match self.client.list_generation_models().await {
                    Ok(models) if !models.is_empty() => {
                        info!(
                            event_name = "dispatch.models.resolved",
                            count = models.len(),
                            "resolved generation-capable models"
                        );
                        models
                    }
                    Ok(_) => {
                        warn!(
                            event_name = "dispatch.models.empty",
                            "model listing was empty; using fallback candidate order"
                        );
                        fallback_models()
                    }
                    Err(error) => {
                        warn!(
                            event_name = "dispatch.models.list_failed",
                            error = %error,
                            "model listing failed; using fallback candidate order"
                        );
                        fallback_models()
                    }
                }
            })
            .await
    }

    /// Attempts generation across the candidates in order. `Success` and
    /// `Blocked` short-circuit; `Failed` is recorded and the loop advances;
    /// `Empty` advances without being recorded.
    pub async fn reply(
        &self,
        message: &str,
        memory: &ConversationMemory,
    ) -> Result<String, DispatchError> {
        let parts = build_prompt(memory, message);
        let mut last_failure: Option<anyhow::Error> = None;

        for model in self.candidates().await {
            match self.attempt(model, &parts).await {
                GenerationAttempt::Success(text) => {
                    info!(event_name = "dispatch.reply", model = %model, "candidate produced a reply");
                    return Ok(text);
                }
                GenerationAttempt::Blocked(reason) => {
                    warn!(
                        event_name = "dispatch.blocked",
                        model = %model,
                        reason = %reason,
                        "completion service blocked the prompt"
                    );
                    return Err(DispatchError::Blocked { reason });
                }
                GenerationAttempt::Empty => {
                    warn!(
                        event_name = "dispatch.empty",
                        model = %model,
                        "candidate returned empty text; trying next"
                    );
                }
                GenerationAttempt::Failed(cause) => {
                    warn!(
                        event_name = "dispatch.attempt_failed",
                        model = %model,
                        error = %cause,
                        "candidate failed; trying next"
                    );
                    last_failure = Some(cause);
                }
            }
        }

        Err(DispatchError::Exhausted(last_failure.unwrap_or_else(|| {
            anyhow!("no model candidate produced a response")
        })))
    }

    async fn attempt(&self, model: &str, parts: &[String]) -> GenerationAttempt {
        match self.client.generate(model, &self.params, parts).await {
            Err(cause) => GenerationAttempt::Failed(cause),
            Ok(completion) => {
                let text = completion.text.trim();
                if !text.is_empty() {
                    GenerationAttempt::Success(text.to_string())
                } else if let Some(reason) = completion.block_reason {
                    GenerationAttempt::Blocked(reason)
                } else {
                    GenerationAttempt::Empty
                }
            }
        }
    }
}

fn fallback_models() -> Vec<String> {
    FALLBACK_MODELS.iter().map(|model| model.to_string()).collect()
}
