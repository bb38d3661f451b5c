use std::sync::Arc;

use masguard_core::AgentStepLog;

/// Invoked synchronously, once per appended step, on the same logical
/// thread of control as the message handler that produced it (§4.4).
pub type StreamCallback = Arc<dyn Fn(&AgentStepLog) + Send + Sync>;
