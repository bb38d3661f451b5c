use thiserror::Error;

/// Errors raised by misuse of a [`crate::StructuredLogWriter`] (§7).
#[derive(Debug, Error)]
pub enum TracerError {
    /// `beginTrace` was called while a trace was already open.
    #[error("a trace is already open")]
    TraceAlreadyOpen,

    /// `endTrace` (or `appendStep`/`appendMessage`) was called with no open trace.
    #[error("no active trace")]
    NoActiveTrace,
}
