use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use masguard_core::{AgentStepLog, MessageLog, WorkflowTrace};
use tracing::error;

use crate::error::TracerError;

/// Begins/appends-to/ends exactly one [`WorkflowTrace`] at a time (§4.3, C4).
///
/// Owned exclusively by one [`WorkflowRunner`](masguard_runner) invocation
/// (§3 "Ownership & lifetime"). Internal mutation is serialized by a mutex
/// rather than `&mut self` so the writer can be shared behind an `Arc` with
/// the runner's stream callback, which needs `currentSteps()` to observe a
/// consistent snapshot mid-run.
pub struct StructuredLogWriter {
    trace: Mutex<Option<WorkflowTrace>>,
    sink_path: Option<PathBuf>,
}

impl StructuredLogWriter {
    /// A writer with no persistence: traces live only in memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trace: Mutex::new(None),
            sink_path: None,
        }
    }

    /// A writer that also appends each sealed trace as one JSON-lines
    /// record to `path` (§4.3, §6.3).
    #[must_use]
    pub fn with_sink(path: impl Into<PathBuf>) -> Self {
        Self {
            trace: Mutex::new(None),
            sink_path: Some(path.into()),
        }
    }

    /// Open a new trace for `task`. Fails with [`TracerError::TraceAlreadyOpen`]
    /// if one is already open.
    pub fn begin_trace(&self, task: impl Into<String>) -> Result<(), TracerError> {
        let mut guard = self.trace.lock().expect("tracer lock poisoned");
        if guard.is_some() {
            return Err(TracerError::TraceAlreadyOpen);
        }
        *guard = Some(WorkflowTrace::new(task));
        Ok(())
    }

    /// Append a step to the open trace.
    pub fn append_step(&self, step: AgentStepLog) -> Result<(), TracerError> {
        let mut guard = self.trace.lock().expect("tracer lock poisoned");
        let trace = guard.as_mut().ok_or(TracerError::NoActiveTrace)?;
        trace.agent_steps.push(step);
        Ok(())
    }

    /// Append a message log to the open trace.
    pub fn append_message(&self, message: MessageLog) -> Result<(), TracerError> {
        let mut guard = self.trace.lock().expect("tracer lock poisoned");
        let trace = guard.as_mut().ok_or(TracerError::NoActiveTrace)?;
        trace.messages.push(message);
        Ok(())
    }

    /// Seal the open trace with a final outcome and return it. Writes the
    /// trace to the configured sink, if any; a sink write failure is logged
    /// but does not affect the returned trace or in-memory state (§4.3).
    pub fn end_trace(&self, success: bool, error: Option<String>) -> Result<WorkflowTrace, TracerError> {
        let sealed = {
            let mut guard = self.trace.lock().expect("tracer lock poisoned");
            let mut trace = guard.take().ok_or(TracerError::NoActiveTrace)?;
            trace.end_time = Some(Utc::now());
            trace.success = success;
            trace.error = error;
            trace
        };

        if let Some(path) = &self.sink_path {
            if let Err(err) = append_to_sink(path, &sealed) {
                error!(path = %path.display(), error = %err, "failed to persist trace to sink");
            }
        }

        Ok(sealed)
    }

    /// A snapshot of the steps appended so far to the open trace, or an
    /// empty list if none is open.
    #[must_use]
    pub fn current_steps(&self) -> Vec<AgentStepLog> {
        let guard = self.trace.lock().expect("tracer lock poisoned");
        guard.as_ref().map(|t| t.agent_steps.clone()).unwrap_or_default()
    }

    /// `true` while a trace is open.
    #[must_use]
    pub fn has_open_trace(&self) -> bool {
        self.trace.lock().expect("tracer lock poisoned").is_some()
    }
}

impl Default for StructuredLogWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn append_to_sink(path: &PathBuf, trace: &WorkflowTrace) -> std::io::Result<()> {
    let line = serde_json::to_string(trace)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use masguard_core::StepType;

    #[test]
    fn begin_while_open_fails() {
        let writer = StructuredLogWriter::new();
        writer.begin_trace("task").unwrap();
        let err = writer.begin_trace("task2").unwrap_err();
        assert!(matches!(err, TracerError::TraceAlreadyOpen));
    }

    #[test]
    fn end_without_open_fails() {
        let writer = StructuredLogWriter::new();
        let err = writer.end_trace(true, None).unwrap_err();
        assert!(matches!(err, TracerError::NoActiveTrace));
    }

    #[test]
    fn append_without_open_fails() {
        let writer = StructuredLogWriter::new();
        let err = writer.append_step(AgentStepLog::new("a", StepType::Respond, serde_json::json!("hi"))).unwrap_err();
        assert!(matches!(err, TracerError::NoActiveTrace));
    }

    #[test]
    fn full_lifecycle_produces_sealed_trace() {
        let writer = StructuredLogWriter::new();
        writer.begin_trace("summarize").unwrap();
        writer.append_message(MessageLog::new("a", "b", "hi")).unwrap();
        writer.append_step(AgentStepLog::new("a", StepType::Respond, serde_json::json!("hi"))).unwrap();
        assert_eq!(writer.current_steps().len(), 1);

        let trace = writer.end_trace(true, None).unwrap();
        assert!(trace.is_sealed());
        assert_eq!(trace.messages.len(), 1);
        assert!(!writer.has_open_trace());
    }

    #[test]
    fn failed_run_is_sealed_with_error_text() {
        let writer = StructuredLogWriter::new();
        writer.begin_trace("task").unwrap();
        let trace = writer.end_trace(false, Some("boom".to_string())).unwrap();
        assert!(!trace.success);
        assert_eq!(trace.error.as_deref(), Some("boom"));
    }

    #[test]
    fn sink_persists_exactly_one_line_per_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let writer = StructuredLogWriter::with_sink(&path);

        writer.begin_trace("task").unwrap();
        for _ in 0..5 {
            writer.append_message(MessageLog::new("a", "b", "hi")).unwrap();
        }
        let trace = writer.end_trace(true, None).unwrap();
        assert_eq!(trace.messages.len(), 5);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);

        let parsed: WorkflowTrace = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.messages.len(), 5);
        assert!(parsed.success);
        assert!(parsed.end_time.unwrap() >= parsed.start_time);
    }
}
