use std::time::Duration;

/// Configuration for one logical LLM client (§6.2).
///
/// Two records of this shape are loaded in practice — one for the "MAS LLM"
/// that drives agents (consumed only indirectly, through the MAS framework)
/// and one for the "Monitor LLM" that drives [`crate::judge::LlmJudge`]s.
/// Only the monitor config's `judge_*`/`retry_*`/`timeout` fields matter to
/// this crate.
#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,

    /// Sampling temperature used specifically for judge calls, overriding `temperature`.
    pub judge_temperature: f64,
    /// Max response tokens used specifically for judge calls, overriding `max_tokens`.
    pub judge_max_tokens: u32,
    /// Number of retries on a transient client error before raising [`crate::error::LlmError`].
    pub retry_count: u32,
    /// Delay between retries.
    pub retry_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl LlmClientConfig {
    /// Construct a config with the monitor-facing defaults used throughout
    /// this harness: zero-temperature, bounded retries, a 10s per-request
    /// timeout.
    pub fn new(provider: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
            temperature: 0.0,
            max_tokens: 512,
            judge_temperature: 0.0,
            judge_max_tokens: 512,
            retry_count: 2,
            retry_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_retry(mut self, count: u32, delay: Duration) -> Self {
        self.retry_count = count;
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let config = LlmClientConfig::new("openai", "gpt-4o-mini", "sk-test");
        assert_eq!(config.retry_count, 2);
        assert_eq!(config.judge_temperature, 0.0);
    }

    #[test]
    fn endpoint_falls_back_when_unset() {
        let config = LlmClientConfig::new("openai", "gpt-4o-mini", "sk-test");
        assert!(config.endpoint().contains("openai.com"));
    }
}
