use thiserror::Error;

/// Errors raised by the downstream LLM client (§6.2, §7 `LLMError`).
///
/// Exhausted retries surface as one of these; a [`crate::judge::LlmJudge`]
/// swallows every variant into `None` rather than propagating it (§4.6,
/// §9's tri-state result type).
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("API error: {0}")]
    Api(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}
