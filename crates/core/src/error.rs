use thiserror::Error;

/// Errors shared across crate boundaries that don't belong to a single
/// component's own error enum.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The adapter could not resolve an agent name (§7 `UnknownAgent`).
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
}
