use std::collections::HashMap;

use async_trait::async_trait;
use masguard_core::AgentName;
use masguard_hooks::Hook;

use crate::error::AdapterError;
use crate::types::{AgentHandle, AgentInfo, DirectResult, MemoryKind, ResourceUsage, WorkflowOptions, WorkflowResult};

/// The strongly-typed adapter contract (§4.2, C3).
///
/// Not object-safe: it uses native `async fn`. Dynamic-dispatch callers
/// (the runner, the safety coordinator) use [`DynMASAdapter`] instead, which
/// every `MASAdapter` implements automatically via the blanket impl below.
pub trait MASAdapter: Send + Sync {
    /// List every agent known to the wrapped framework.
    fn agents(&self) -> impl std::future::Future<Output = Vec<AgentInfo>> + Send;

    /// Resolve `name` to a handle. Fails with [`AdapterError::UnknownAgent`].
    fn agent(&self, name: &AgentName) -> impl std::future::Future<Output = Result<AgentHandle, AdapterError>> + Send;

    /// Drive one multi-turn workflow from a seed task.
    fn run_workflow(
        &self,
        task: &str,
        opts: &WorkflowOptions,
    ) -> impl std::future::Future<Output = Result<WorkflowResult, AdapterError>> + Send;

    /// The allowed-speaker graph (§4.2 topology derivation).
    fn topology(&self) -> impl std::future::Future<Output = HashMap<AgentName, Vec<AgentName>>> + Send;

    /// Append `hook` to the adapter's hook chain, wiring interception on
    /// first call.
    fn register_hook(&self, hook: Hook);

    /// Empty the hook chain. Does not un-wire (§4.1).
    fn clear_hooks(&self);

    /// Drive one agent directly with a message, bypassing the rest of the
    /// workflow loop.
    fn chat(
        &self,
        agent: &AgentName,
        message: &str,
        history: Option<&[String]>,
        mock: bool,
    ) -> impl std::future::Future<Output = Result<DirectResult, AdapterError>> + Send;

    /// Deliver `message` from `from` to `to` through the hook chain without
    /// running a full workflow.
    fn simulate_message(
        &self,
        from: &AgentName,
        to: &AgentName,
        message: &str,
        mock: bool,
    ) -> impl std::future::Future<Output = Result<DirectResult, AdapterError>> + Send;

    /// Inject a tool call result into `agent`'s context.
    fn inject_tool(
        &self,
        agent: &AgentName,
        tool: &str,
        params: &serde_json::Value,
        mock: bool,
    ) -> impl std::future::Future<Output = Result<DirectResult, AdapterError>> + Send;

    /// Inject content into `agent`'s context or system memory.
    fn inject_memory(
        &self,
        agent: &AgentName,
        content: &str,
        memory_kind: MemoryKind,
        mock: bool,
    ) -> impl std::future::Future<Output = Result<DirectResult, AdapterError>> + Send;

    /// Send `message` from `from` to every agent in `to`.
    fn broadcast(
        &self,
        from: &AgentName,
        to: &[AgentName],
        message: &str,
        mock: bool,
    ) -> impl std::future::Future<Output = Result<Vec<DirectResult>, AdapterError>> + Send;

    /// Send `message` to `to` while claiming to be `spoofed` rather than `real`.
    fn spoof_identity(
        &self,
        real: &AgentName,
        spoofed: &AgentName,
        to: &AgentName,
        message: &str,
        mock: bool,
    ) -> impl std::future::Future<Output = Result<DirectResult, AdapterError>> + Send;

    /// Resource usage for `agent`, or the whole adapter if `None`.
    fn resource_usage(&self, agent: Option<&AgentName>) -> impl std::future::Future<Output = ResourceUsage> + Send;
}

/// Object-safe bridge over [`MASAdapter`], for storage behind `Arc<dyn DynMASAdapter>`.
#[async_trait]
pub trait DynMASAdapter: Send + Sync {
    async fn agents(&self) -> Vec<AgentInfo>;
    async fn agent(&self, name: &AgentName) -> Result<AgentHandle, AdapterError>;
    async fn run_workflow(&self, task: &str, opts: &WorkflowOptions) -> Result<WorkflowResult, AdapterError>;
    async fn topology(&self) -> HashMap<AgentName, Vec<AgentName>>;
    fn register_hook(&self, hook: Hook);
    fn clear_hooks(&self);
    async fn chat(&self, agent: &AgentName, message: &str, history: Option<&[String]>, mock: bool) -> Result<DirectResult, AdapterError>;
    async fn simulate_message(&self, from: &AgentName, to: &AgentName, message: &str, mock: bool) -> Result<DirectResult, AdapterError>;
    async fn inject_tool(&self, agent: &AgentName, tool: &str, params: &serde_json::Value, mock: bool) -> Result<DirectResult, AdapterError>;
    async fn inject_memory(&self, agent: &AgentName, content: &str, memory_kind: MemoryKind, mock: bool) -> Result<DirectResult, AdapterError>;
    async fn broadcast(&self, from: &AgentName, to: &[AgentName], message: &str, mock: bool) -> Result<Vec<DirectResult>, AdapterError>;
    async fn spoof_identity(&self, real: &AgentName, spoofed: &AgentName, to: &AgentName, message: &str, mock: bool) -> Result<DirectResult, AdapterError>;
    async fn resource_usage(&self, agent: Option<&AgentName>) -> ResourceUsage;
}

#[async_trait]
impl<T: MASAdapter + Sync> DynMASAdapter for T {
    async fn agents(&self) -> Vec<AgentInfo> {
        MASAdapter::agents(self).await
    }

    async fn agent(&self, name: &AgentName) -> Result<AgentHandle, AdapterError> {
        MASAdapter::agent(self, name).await
    }

    async fn run_workflow(&self, task: &str, opts: &WorkflowOptions) -> Result<WorkflowResult, AdapterError> {
        MASAdapter::run_workflow(self, task, opts).await
    }

    async fn topology(&self) -> HashMap<AgentName, Vec<AgentName>> {
        MASAdapter::topology(self).await
    }

    fn register_hook(&self, hook: Hook) {
        MASAdapter::register_hook(self, hook);
    }

    fn clear_hooks(&self) {
        MASAdapter::clear_hooks(self);
    }

    async fn chat(&self, agent: &AgentName, message: &str, history: Option<&[String]>, mock: bool) -> Result<DirectResult, AdapterError> {
        MASAdapter::chat(self, agent, message, history, mock).await
    }

    async fn simulate_message(&self, from: &AgentName, to: &AgentName, message: &str, mock: bool) -> Result<DirectResult, AdapterError> {
        MASAdapter::simulate_message(self, from, to, message, mock).await
    }

    async fn inject_tool(&self, agent: &AgentName, tool: &str, params: &serde_json::Value, mock: bool) -> Result<DirectResult, AdapterError> {
        MASAdapter::inject_tool(self, agent, tool, params, mock).await
    }

    async fn inject_memory(&self, agent: &AgentName, content: &str, memory_kind: MemoryKind, mock: bool) -> Result<DirectResult, AdapterError> {
        MASAdapter::inject_memory(self, agent, content, memory_kind, mock).await
    }

    async fn broadcast(&self, from: &AgentName, to: &[AgentName], message: &str, mock: bool) -> Result<Vec<DirectResult>, AdapterError> {
        MASAdapter::broadcast(self, from, to, message, mock).await
    }

    async fn spoof_identity(&self, real: &AgentName, spoofed: &AgentName, to: &AgentName, message: &str, mock: bool) -> Result<DirectResult, AdapterError> {
        MASAdapter::spoof_identity(self, real, spoofed, to, message, mock).await
    }

    async fn resource_usage(&self, agent: Option<&AgentName>) -> ResourceUsage {
        MASAdapter::resource_usage(self, agent).await
    }
}
