use thiserror::Error;

/// Errors raised by a [`crate::MASAdapter`] implementation.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// `agent(name)` could not resolve the given name (§7 `UnknownAgent`).
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    /// The underlying MAS framework's workflow call errored (§7 `WorkflowFailure`).
    #[error("workflow failed: {0}")]
    WorkflowFailure(String),

    /// A hook in the chain aborted delivery of a message.
    #[error("hook chain rejected message: {0}")]
    HookRejected(#[from] masguard_hooks::HookError),
}
