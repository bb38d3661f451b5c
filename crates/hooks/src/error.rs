use thiserror::Error;

/// Errors raised while applying the hook chain.
#[derive(Debug, Error)]
pub enum HookError {
    /// A hook threw. Per §4.1, the entire chain aborts and the exception
    /// propagates to the caller; partial mutations up to the failing hook
    /// are discarded.
    #[error("hook failed: {0}")]
    Failed(String),
}
