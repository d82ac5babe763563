//! LLM client port.
//!
//! Reflection performs exactly one outbound generation call per cycle.
//! The client is injected at service construction so tests can substitute
//! a deterministic stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error types for LLM generation.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Generation timeout after {0}s")]
    Timeout(u64),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Parameters controlling a single generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 1.0)
    pub temperature: f32,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

/// Port trait for text-generation backends.
///
/// Implementations must be `Send + Sync` for concurrent use across tokio
/// tasks. The contract is a single completion: given a system prompt and a
/// user prompt, return the generated text or fail.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Identifier for this backend (e.g. "anthropic", "mock").
    fn client_id(&self) -> &str;

    /// Generate a completion.
    ///
    /// # Errors
    /// - `LlmError::Timeout` - the call exceeded `opts.timeout_secs`
    /// - `LlmError::Api` - the backend returned a non-success status
    /// - `LlmError::Network` - the backend could not be reached
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        opts: &GenerationOptions,
    ) -> Result<String, LlmError>;
}
