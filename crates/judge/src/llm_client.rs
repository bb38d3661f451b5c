use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::LlmClientConfig;
use crate::error::LlmError;

/// The downstream LLM client contract (§6.2).
///
/// Implementations must retry transient failures internally up to
/// `config.retry_count` times, waiting `config.retry_delay` between
/// attempts, before raising [`LlmError`] — retry policy is not the caller's
/// concern.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    async fn generate_with_system(
        &self,
        system: &str,
        user: &str,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmError>;
}

/// An HTTP client over an OpenAI-compatible chat completions API.
pub struct HttpLlmClient {
    http: reqwest::Client,
    config: LlmClientConfig,
}

impl HttpLlmClient {
    pub fn new(config: LlmClientConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn chat_once(&self, system: &str, user: &str, temperature: f64, max_tokens: u32) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": temperature,
            "max_tokens": max_tokens,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ]
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.endpoint()))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout.as_secs())
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {status}: {text}")));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| LlmError::Api(e.to_string()))?;
        payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| LlmError::Api(format!("unexpected response shape: {payload}")))
    }

    async fn with_retries<F, Fut>(&self, mut attempt: F) -> Result<String, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<String, LlmError>>,
    {
        let mut last_err = None;
        for attempt_number in 0..=self.config.retry_count {
            match attempt().await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    warn!(attempt = attempt_number, error = %err, "LLM client request failed");
                    last_err = Some(err);
                    if attempt_number < self.config.retry_count {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }
        Err(last_err.expect("at least one attempt always runs"))
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.generate_with_system("You are a helpful assistant.", prompt, None, None).await
    }

    async fn generate_with_system(
        &self,
        system: &str,
        user: &str,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmError> {
        let temperature = temperature.unwrap_or(self.config.judge_temperature);
        let max_tokens = max_tokens.unwrap_or(self.config.judge_max_tokens);
        debug!(model = %self.config.model, "sending judge request");
        self.with_retries(|| self.chat_once(system, user, temperature, max_tokens)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A client that fails its first `failures` calls, then succeeds.
    struct FlakyClient {
        failures: std::sync::atomic::AtomicU32,
        response: String,
    }

    #[async_trait]
    impl LlmClient for FlakyClient {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            unimplemented!()
        }

        async fn generate_with_system(&self, _s: &str, _u: &str, _t: Option<f64>, _m: Option<u32>) -> Result<String, LlmError> {
            if self.failures.fetch_sub(1, std::sync::atomic::Ordering::SeqCst) > 0 {
                Err(LlmError::Http("connection reset".into()))
            } else {
                Ok(self.response.clone())
            }
        }
    }

    #[tokio::test]
    async fn flaky_client_recovers_within_retry_budget() {
        let client = FlakyClient {
            failures: std::sync::atomic::AtomicU32::new(1),
            response: "ok".to_string(),
        };
        let result = client.generate_with_system("sys", "user", None, None).await.unwrap();
        assert_eq!(result, "ok");
    }
}
