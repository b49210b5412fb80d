//! Generative fallback for the Streambot sales assistant.
//!
//! When the deterministic order flow in `streambot-core` produces no reply,
//! the message is handed to the [`dispatcher::FallbackDispatcher`], which:
//! 1. Resolves a ranked list of usable model identifiers once per process
//!    (generation-capable models from the completion service, or a fixed
//!    fallback order).
//! 2. Builds a prompt from the fixed business preamble, the visitor's
//!    conversation memory, and the raw message (`prompt`).
//! 3. Attempts generation across the candidates in order until one returns
//!    non-empty text (`llm::CompletionClient`).
//!
//! The model is strictly a copywriter. Pricing, order state, and receipts are
//! deterministic decisions made by `streambot-core`; nothing the model says
//! feeds back into order state.

pub mod dispatcher;
pub mod gemini;
pub mod llm;
pub mod prompt;

pub use dispatcher::{DispatchError, FallbackDispatcher};
pub use gemini::GeminiClient;
pub use llm::{Completion, CompletionClient, GenerationParams};
