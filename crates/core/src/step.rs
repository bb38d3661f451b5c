use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AgentName;

/// The kind of event an [`AgentStepLog`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Receive,
    Think,
    ToolCall,
    Respond,
    Error,
    Intercept,
}

/// A single step in an agent's lifecycle, emitted by the
/// [`StructuredLogWriter`](masguard_tracer::StructuredLogWriter) and consumed
/// by [`Monitor`](masguard_plugins::Monitor) plugins.
///
/// `content` is opaque to the writer (§3) but must be coercible to a string
/// for monitor/judge prompts; [`AgentStepLog::content_as_str`] provides that
/// coercion so monitors don't each reimplement it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStepLog {
    pub timestamp: DateTime<Utc>,
    pub agent_name: AgentName,
    pub step_type: StepType,
    pub content: serde_json::Value,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl AgentStepLog {
    /// Construct a step log stamped with the current time.
    pub fn new(agent_name: impl Into<AgentName>, step_type: StepType, content: impl Into<serde_json::Value>) -> Self {
        Self {
            timestamp: Utc::now(),
            agent_name: agent_name.into(),
            step_type,
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Coerce `content` to a display string, regardless of its JSON shape.
    ///
    /// Strings are returned verbatim (without surrounding quotes); every
    /// other JSON value is rendered via its `Display`/`to_string` form so a
    /// judge prompt always has *something* to analyze.
    #[must_use]
    pub fn content_as_str(&self) -> String {
        match &self.content {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
