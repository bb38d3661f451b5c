use std::collections::HashMap;
use std::sync::Arc;

use masguard_adapter::{AdapterError, AgentInfo, DirectResult, DynMASAdapter, MemoryKind, ResourceUsage};
use masguard_core::AgentName;
use masguard_hooks::MessageInterception;
use masguard_runner::{StreamCallback, WorkflowRunner};

/// The L2 facade (C6): the pre-deployment test primitives `RiskTest`
/// implementations call through, plus a factory for the four
/// [`WorkflowRunner`] strategies. Every primitive is a thin forward to the
/// wrapped [`DynMASAdapter`] — the intermediary adds no behavior of its own,
/// only a stable point of composition for the coordinator and for tests.
#[derive(Clone)]
pub struct Intermediary {
    adapter: Arc<dyn DynMASAdapter>,
}

impl Intermediary {
    #[must_use]
    pub fn new(adapter: Arc<dyn DynMASAdapter>) -> Self {
        Self { adapter }
    }

    /// The wrapped adapter, as risk tests expect to receive it (§4.7:
    /// "exercising a specific risk via the intermediary's primitives").
    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn DynMASAdapter> {
        &self.adapter
    }

    pub async fn agents(&self) -> Vec<AgentInfo> {
        self.adapter.agents().await
    }

    pub async fn chat(&self, agent: &AgentName, message: &str, history: Option<&[String]>, mock: bool) -> Result<DirectResult, AdapterError> {
        self.adapter.chat(agent, message, history, mock).await
    }

    pub async fn simulate_message(&self, from: &AgentName, to: &AgentName, message: &str, mock: bool) -> Result<DirectResult, AdapterError> {
        self.adapter.simulate_message(from, to, message, mock).await
    }

    pub async fn inject_tool(&self, agent: &AgentName, tool: &str, params: &serde_json::Value, mock: bool) -> Result<DirectResult, AdapterError> {
        self.adapter.inject_tool(agent, tool, params, mock).await
    }

    pub async fn inject_memory(&self, agent: &AgentName, content: &str, memory_kind: MemoryKind, mock: bool) -> Result<DirectResult, AdapterError> {
        self.adapter.inject_memory(agent, content, memory_kind, mock).await
    }

    pub async fn broadcast(&self, from: &AgentName, to: &[AgentName], message: &str, mock: bool) -> Result<Vec<DirectResult>, AdapterError> {
        self.adapter.broadcast(from, to, message, mock).await
    }

    pub async fn spoof_identity(&self, real: &AgentName, spoofed: &AgentName, to: &AgentName, message: &str, mock: bool) -> Result<DirectResult, AdapterError> {
        self.adapter.spoof_identity(real, spoofed, to, message, mock).await
    }

    pub async fn resource_usage(&self, agent: Option<&AgentName>) -> ResourceUsage {
        self.adapter.resource_usage(agent).await
    }

    pub async fn topology(&self) -> HashMap<AgentName, Vec<AgentName>> {
        self.adapter.topology().await
    }

    /// No interception, no tracing.
    #[must_use]
    pub fn basic_runner(&self) -> WorkflowRunner {
        WorkflowRunner::basic(Arc::clone(&self.adapter))
    }

    /// Rewrites matching messages via `interceptions`; does not trace.
    #[must_use]
    pub fn intercepting_runner(&self, interceptions: Vec<MessageInterception>) -> WorkflowRunner {
        WorkflowRunner::intercepting(Arc::clone(&self.adapter), interceptions)
    }

    /// Traces every message, optionally streaming each step to `callback`.
    #[must_use]
    pub fn monitored_runner(&self, callback: Option<StreamCallback>) -> WorkflowRunner {
        WorkflowRunner::monitored(Arc::clone(&self.adapter), callback)
    }

    /// Rewrites matching messages and traces the result.
    #[must_use]
    pub fn monitored_intercepting_runner(&self, interceptions: Vec<MessageInterception>, callback: Option<StreamCallback>) -> WorkflowRunner {
        WorkflowRunner::monitored_intercepting(Arc::clone(&self.adapter), interceptions, callback)
    }
}
