use std::sync::Arc;

use masguard_adapter::{AdapterError, DynMASAdapter, WorkflowOptions, WorkflowResult};
use masguard_core::{AgentStepLog, MessageLog, StepType};
use masguard_hooks::{apply_interceptions, Hook, HookError, MessageInterception};
use masguard_tracer::StructuredLogWriter;

use crate::error::RunnerError;
use crate::hook_guard::HookGuard;
use crate::stream::StreamCallback;

enum RunnerKind {
    Basic,
    Intercepting {
        interceptions: Arc<Vec<MessageInterception>>,
    },
    Monitored {
        writer: Arc<StructuredLogWriter>,
        callback: Option<StreamCallback>,
    },
    MonitoredIntercepting {
        interceptions: Arc<Vec<MessageInterception>>,
        writer: Arc<StructuredLogWriter>,
        callback: Option<StreamCallback>,
    },
}

/// One of the four execution strategies over a [`MASAdapter`](masguard_adapter::MASAdapter) (§4.4, C5).
///
/// All four share the same template — `preRun` (identity for every
/// variant), install this run's hook, drive the workflow, remove the hook
/// on every exit path, `postRun` — and differ only in what hook they
/// install and what `postRun` attaches to the result.
pub struct WorkflowRunner {
    adapter: Arc<dyn DynMASAdapter>,
    kind: RunnerKind,
}

impl WorkflowRunner {
    /// No interception, no tracing: a thin pass-through over `runWorkflow`.
    #[must_use]
    pub fn basic(adapter: Arc<dyn DynMASAdapter>) -> Self {
        Self {
            adapter,
            kind: RunnerKind::Basic,
        }
    }

    /// Rewrites matching messages via `interceptions`; does not trace.
    #[must_use]
    pub fn intercepting(adapter: Arc<dyn DynMASAdapter>, interceptions: Vec<MessageInterception>) -> Self {
        Self {
            adapter,
            kind: RunnerKind::Intercepting {
                interceptions: Arc::new(interceptions),
            },
        }
    }

    /// Traces every message, optionally streaming each step to `callback`
    /// as it's appended; does not rewrite content.
    #[must_use]
    pub fn monitored(adapter: Arc<dyn DynMASAdapter>, callback: Option<StreamCallback>) -> Self {
        Self {
            adapter,
            kind: RunnerKind::Monitored {
                writer: Arc::new(StructuredLogWriter::new()),
                callback,
            },
        }
    }

    /// Rewrites matching messages and traces the result, including one
    /// `intercept` step per applied interception (§4.4).
    #[must_use]
    pub fn monitored_intercepting(
        adapter: Arc<dyn DynMASAdapter>,
        interceptions: Vec<MessageInterception>,
        callback: Option<StreamCallback>,
    ) -> Self {
        Self {
            adapter,
            kind: RunnerKind::MonitoredIntercepting {
                interceptions: Arc::new(interceptions),
                writer: Arc::new(StructuredLogWriter::new()),
                callback,
            },
        }
    }

    fn writer(&self) -> Option<&Arc<StructuredLogWriter>> {
        match &self.kind {
            RunnerKind::Basic | RunnerKind::Intercepting { .. } => None,
            RunnerKind::Monitored { writer, .. } | RunnerKind::MonitoredIntercepting { writer, .. } => Some(writer),
        }
    }

    fn build_hook(&self) -> Option<Hook> {
        match &self.kind {
            RunnerKind::Basic => None,
            RunnerKind::Intercepting { interceptions } => {
                let interceptions = Arc::clone(interceptions);
                Some(Arc::new(move |message: masguard_core::Message| {
                    let application = apply_interceptions(message, &interceptions);
                    Ok(application.message)
                }))
            }
            RunnerKind::Monitored { writer, callback } => {
                let writer = Arc::clone(writer);
                let callback = callback.clone();
                Some(Arc::new(move |message: masguard_core::Message| {
                    log_receive(&writer, &callback, message.clone())?;
                    Ok(message)
                }))
            }
            RunnerKind::MonitoredIntercepting {
                interceptions,
                writer,
                callback,
            } => {
                let interceptions = Arc::clone(interceptions);
                let writer = Arc::clone(writer);
                let callback = callback.clone();
                Some(Arc::new(move |message: masguard_core::Message| {
                    let application = apply_interceptions(message, &interceptions);
                    for record in &application.records {
                        let step = AgentStepLog::new(record.target.clone(), StepType::Intercept, serde_json::Value::String(record.modified.clone()))
                            .with_metadata("original", record.original.clone())
                            .with_metadata("modified", record.modified.clone())
                            .with_metadata("source", record.source.to_string())
                            .with_metadata("target", record.target.to_string());
                        emit(&writer, &callback, step)?;
                    }
                    log_receive(&writer, &callback, application.message.clone())?;
                    Ok(application.message)
                }))
            }
        }
    }

    /// Run `task` through this runner's strategy.
    pub async fn run(&self, task: &str, opts: &WorkflowOptions) -> Result<WorkflowResult, RunnerError> {
        let task = task.to_string();

        if let Some(writer) = self.writer() {
            writer.begin_trace(task.clone())?;
        }

        let _guard = self.build_hook().map(|hook| {
            self.adapter.register_hook(hook);
            HookGuard::new(Arc::clone(&self.adapter))
        });

        let outcome = self.adapter.run_workflow(&task, opts).await;

        let result = match outcome {
            Ok(result) => result,
            Err(AdapterError::HookRejected(err)) => WorkflowResult::failure(format!("hook rejected message: {err}")),
            Err(err) => WorkflowResult::failure(err.to_string()),
        };

        // `_guard` is dropped at the end of this scope regardless of which
        // branch above ran or whether `attach_trace` below errors, so hooks
        // are removed on every exit path (§4.4, §5).
        self.attach_trace(result)
    }

    fn attach_trace(&self, mut result: WorkflowResult) -> Result<WorkflowResult, RunnerError> {
        let Some(writer) = self.writer() else {
            return Ok(result);
        };

        let trace = writer.end_trace(result.success, result.error.clone())?;
        result
            .metadata
            .insert("logs".to_string(), serde_json::to_value(&trace.agent_steps).expect("AgentStepLog always serializes"));
        result
            .metadata
            .insert("trace".to_string(), serde_json::to_value(&trace).expect("WorkflowTrace always serializes"));
        Ok(result)
    }
}

fn log_receive(
    writer: &Arc<StructuredLogWriter>,
    callback: &Option<StreamCallback>,
    message: masguard_core::Message,
) -> Result<(), HookError> {
    let message_log = MessageLog::new(message.from.clone(), message.to.clone(), message.content.clone());
    writer.append_message(message_log).map_err(|e| HookError::Failed(e.to_string()))?;

    let step = AgentStepLog::new(message.to.clone(), StepType::Receive, serde_json::Value::String(message.content.clone()));
    emit(writer, callback, step)
}

fn emit(writer: &Arc<StructuredLogWriter>, callback: &Option<StreamCallback>, step: AgentStepLog) -> Result<(), HookError> {
    writer.append_step(step.clone()).map_err(|e| HookError::Failed(e.to_string()))?;
    if let Some(callback) = callback {
        callback(&step);
    }
    Ok(())
}
