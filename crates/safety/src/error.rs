use thiserror::Error;

/// Misconfiguration of the harness itself (§7: the one class of error a
/// batch API is allowed to surface instead of swallowing into a structured
/// result).
#[derive(Debug, Error)]
pub enum SafetyError {
    #[error("configuration error: {0}")]
    Configuration(String),
}
