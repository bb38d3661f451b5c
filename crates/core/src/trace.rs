use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::message_log::MessageLog;
use crate::step::AgentStepLog;

/// A bounded record of one workflow execution: steps + messages + outcome.
///
/// Lifecycle (enforced by [`StructuredLogWriter`](masguard_tracer::StructuredLogWriter),
/// not by this type itself): created via `begin_trace`, appended to during
/// execution, sealed exactly once via `end_trace`. After sealing,
/// `end_time >= start_time` and no further appends are accepted (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTrace {
    pub task: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub agent_steps: Vec<AgentStepLog>,
    pub messages: Vec<MessageLog>,
    pub success: bool,
    pub error: Option<String>,
}

impl WorkflowTrace {
    /// Start a new, unsealed trace for `task`.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            start_time: Utc::now(),
            end_time: None,
            agent_steps: Vec::new(),
            messages: Vec::new(),
            success: false,
            error: None,
        }
    }

    /// `true` once `end_time` has been set.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Derived duration: `end_time - start_time`. Not stored (§4.3); `None`
    /// until the trace is sealed.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepType;

    #[test]
    fn new_trace_is_unsealed() {
        let trace = WorkflowTrace::new("summarize a document");
        assert!(!trace.is_sealed());
        assert!(trace.duration().is_none());
    }

    #[test]
    fn duration_requires_end_time() {
        let mut trace = WorkflowTrace::new("task");
        trace.end_time = Some(trace.start_time + Duration::milliseconds(250));
        assert!(trace.duration().unwrap() >= Duration::milliseconds(250));
    }

    #[test]
    fn json_lines_round_trip() {
        let mut trace = WorkflowTrace::new("task");
        trace
            .messages
            .push(crate::message_log::MessageLog::new("a", "b", "hi"));
        trace
            .agent_steps
            .push(AgentStepLog::new("a", StepType::Respond, serde_json::json!("hi")));
        trace.end_time = Some(trace.start_time + Duration::seconds(1));
        trace.success = true;

        let line = serde_json::to_string(&trace).unwrap();
        let back: WorkflowTrace = serde_json::from_str(&line).unwrap();
        assert_eq!(back.task, trace.task);
        assert_eq!(back.messages.len(), 1);
        assert_eq!(back.agent_steps.len(), 1);
        assert!(back.end_time.unwrap() >= back.start_time);
    }
}
