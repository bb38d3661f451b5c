use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::AgentName;

/// A record of one in-flight message, captured by the
/// [`StructuredLogWriter`](masguard_tracer::StructuredLogWriter).
///
/// Every in-flight message has exactly one `MessageLog`; `message_id` is
/// generated at emission time (§3), never supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageLog {
    pub timestamp: DateTime<Utc>,
    pub from_agent: AgentName,
    pub to_agent: AgentName,
    pub message: String,
    pub message_id: Uuid,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl MessageLog {
    /// Create a new message log, generating a fresh UUIDv4 `message_id`
    /// and stamping the current time.
    pub fn new(from_agent: impl Into<AgentName>, to_agent: impl Into<AgentName>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            message: message.into(),
            message_id: Uuid::new_v4(),
            metadata: HashMap::new(),
        }
    }
}
