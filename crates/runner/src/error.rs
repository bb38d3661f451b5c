use thiserror::Error;

/// Errors raised by the runner's own bookkeeping, as distinct from a
/// workflow failure (which the runner captures into a failed
/// [`WorkflowResult`](masguard_adapter::WorkflowResult) rather than
/// propagating — §7).
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The writer rejected a trace lifecycle call; a misused or concurrently
    /// reused runner, not a workflow failure.
    #[error("trace writer misuse: {0}")]
    Tracer(#[from] masguard_tracer::TracerError),
}
