//! Mock LLM client for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::ports::{GenerationOptions, LlmClient, LlmError};

/// Scripted outcome for one generation call.
#[derive(Debug, Clone)]
pub struct MockLlmResponse {
    /// Text to return
    pub output: String,
    /// Whether to simulate failure
    pub fail: bool,
    /// Error message if failing
    pub error_message: Option<String>,
}

impl Default for MockLlmResponse {
    fn default() -> Self {
        Self {
            output: "1. Mock directive".to_string(),
            fail: false,
            error_message: None,
        }
    }
}

impl MockLlmResponse {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            fail: true,
            error_message: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Mock LLM client with a response script and a call counter.
///
/// Scripted responses are consumed in order; once exhausted, the default
/// response repeats.
pub struct MockLlm {
    script: RwLock<VecDeque<MockLlmResponse>>,
    default_response: MockLlmResponse,
    calls: AtomicUsize,
}

impl MockLlm {
    pub fn new() -> Self {
        Self {
            script: RwLock::new(VecDeque::new()),
            default_response: MockLlmResponse::default(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_default_response(response: MockLlmResponse) -> Self {
        Self {
            script: RwLock::new(VecDeque::new()),
            default_response: response,
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a scripted response for the next call.
    pub async fn push_response(&self, response: MockLlmResponse) {
        self.script.write().await.push_back(response);
    }

    /// Number of generation calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    fn client_id(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _opts: &GenerationOptions,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let response = self
            .script
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone());

        if response.fail {
            return Err(LlmError::Api {
                status: 500,
                message: response
                    .error_message
                    .unwrap_or_else(|| "scripted failure".to_string()),
            });
        }
        Ok(response.output)
    }
}
