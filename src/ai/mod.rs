//! Generative-AI assistant backed by a local Ollama instance.

pub mod assistant;
pub mod ollama;
pub mod prompts;

pub use assistant::*;
pub use ollama::*;

use thiserror::Error;

use crate::models::enums::ChatRole;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("AI request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("AI assistant is not configured")]
    NotConfigured,

    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),

    #[error("Medication name cannot be empty")]
    EmptyMedicationName,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One turn of a chat conversation sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    /// Base64-encoded images attached to this turn.
    pub images: Vec<String>,
}

impl ChatTurn {
    pub fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            images: Vec::new(),
        }
    }
}

/// Abstraction over LLM backends so handlers can be tested with a mock.
pub trait LlmClient: Send + Sync {
    /// Single-shot completion.
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, AiError>;

    /// Completion over a multi-turn conversation. `system` is sent as the
    /// leading system message when non-empty.
    fn chat(&self, model: &str, system: &str, turns: &[ChatTurn]) -> Result<String, AiError>;

    fn list_models(&self) -> Result<Vec<String>, AiError>;
}
