use async_trait::async_trait;

use crate::error::LlmError;
use crate::llm_client::LlmClient;

/// An [`LlmClient`] that always returns a fixed response, for testing judges
/// without network I/O.
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    #[must_use]
    pub fn with_response(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }

    async fn generate_with_system(&self, _system: &str, _user: &str, _temperature: Option<f64>, _max_tokens: Option<u32>) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }
}

/// An [`LlmClient`] that always errors, for exercising a judge's absent path.
#[derive(Debug, Clone)]
pub struct FailingLlmClient {
    message: String,
}

impl FailingLlmClient {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Api(self.message.clone()))
    }

    async fn generate_with_system(&self, _system: &str, _user: &str, _temperature: Option<f64>, _max_tokens: Option<u32>) -> Result<String, LlmError> {
        Err(LlmError::Api(self.message.clone()))
    }
}
