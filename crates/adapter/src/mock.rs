use std::collections::HashMap;
use std::sync::Mutex;

use masguard_core::{AgentName, Message};
use masguard_hooks::{Hook, HookChain};

use crate::adapter::MASAdapter;
use crate::error::AdapterError;
use crate::topology::derive_topology;
use crate::types::{AgentHandle, AgentInfo, DirectResult, MemoryKind, ResourceUsage, WorkflowOptions, WorkflowResult};

/// A scripted stand-in for a real MAS framework.
///
/// `runWorkflow` replays a fixed sequence of `(from, to, content)` exchanges
/// through the adapter's hook chain, exactly as a real adapter would relay
/// the messages its wrapped framework actually produced. This is the
/// reference adapter used by tests and by every example in this crate: it
/// lets the hook chain, tracer, and runner be exercised deterministically
/// without an LLM in the loop (§4.2's `mock=true` intent, generalized to
/// the whole workflow).
pub struct MockAdapter {
    agents: Vec<AgentInfo>,
    script: Vec<(AgentName, AgentName, String)>,
    explicit_topology: Option<HashMap<AgentName, Vec<AgentName>>>,
    hook_chain: HookChain,
    usage: Mutex<HashMap<AgentName, ResourceUsage>>,
}

impl MockAdapter {
    #[must_use]
    pub fn new(agents: Vec<AgentInfo>) -> Self {
        Self {
            agents,
            script: Vec::new(),
            explicit_topology: None,
            hook_chain: HookChain::new(),
            usage: Mutex::new(HashMap::new()),
        }
    }

    /// Configure the message exchange `runWorkflow` replays.
    #[must_use]
    pub fn with_script(mut self, script: Vec<(AgentName, AgentName, String)>) -> Self {
        self.script = script;
        self
    }

    /// Force `topology()` to return this map instead of deriving one.
    #[must_use]
    pub fn with_explicit_topology(mut self, topology: HashMap<AgentName, Vec<AgentName>>) -> Self {
        self.explicit_topology = Some(topology);
        self
    }

    fn record_sent(&self, agent: &AgentName) {
        let mut usage = self.usage.lock().expect("usage lock poisoned");
        let entry = usage.entry(agent.clone()).or_insert_with(|| ResourceUsage {
            agent: Some(agent.clone()),
            messages_sent: 0,
            tokens_estimate: 0,
        });
        entry.messages_sent += 1;
        entry.tokens_estimate += 1;
    }

    fn known(&self, name: &AgentName) -> Result<(), AdapterError> {
        if self.agents.iter().any(|a| &a.name == name) {
            Ok(())
        } else {
            Err(AdapterError::UnknownAgent(name.to_string()))
        }
    }
}

impl MASAdapter for MockAdapter {
    async fn agents(&self) -> Vec<AgentInfo> {
        self.agents.clone()
    }

    async fn agent(&self, name: &AgentName) -> Result<AgentHandle, AdapterError> {
        self.known(name)?;
        Ok(AgentHandle { name: name.clone() })
    }

    async fn run_workflow(&self, task: &str, _opts: &WorkflowOptions) -> Result<WorkflowResult, AdapterError> {
        let mut delivered = Vec::with_capacity(self.script.len());
        let mut last_output = task.to_string();

        for (from, to, content) in &self.script {
            let message = Message::new(from.clone(), to.clone(), content.clone());
            let delivered_message = self.hook_chain.apply(message)?;
            self.record_sent(from);
            last_output = delivered_message.content.clone();
            delivered.push(delivered_message);
        }

        Ok(WorkflowResult::success(last_output, delivered))
    }

    async fn topology(&self) -> HashMap<AgentName, Vec<AgentName>> {
        let names: Vec<AgentName> = self.agents.iter().map(|a| a.name.clone()).collect();
        derive_topology(self.explicit_topology.clone(), &names)
    }

    fn register_hook(&self, hook: Hook) {
        self.hook_chain.register(hook);
    }

    fn clear_hooks(&self) {
        self.hook_chain.clear();
    }

    async fn chat(&self, agent: &AgentName, message: &str, history: Option<&[String]>, mock: bool) -> Result<DirectResult, AdapterError> {
        self.known(agent)?;
        if mock {
            return Ok(DirectResult::new(true, agent.clone(), format!("[mock reply to] {message}")));
        }
        let turns = history.map_or(0, <[String]>::len);
        self.record_sent(agent);
        Ok(DirectResult::new(false, agent.clone(), format!("reply after {turns} prior turns: {message}")))
    }

    async fn simulate_message(&self, from: &AgentName, to: &AgentName, message: &str, mock: bool) -> Result<DirectResult, AdapterError> {
        self.known(from)?;
        self.known(to)?;
        if mock {
            return Ok(DirectResult::new(true, to.clone(), message.to_string()));
        }
        let delivered = self.hook_chain.apply(Message::new(from.clone(), to.clone(), message))?;
        self.record_sent(from);
        Ok(DirectResult::new(false, to.clone(), delivered.content))
    }

    async fn inject_tool(&self, agent: &AgentName, tool: &str, params: &serde_json::Value, mock: bool) -> Result<DirectResult, AdapterError> {
        self.known(agent)?;
        let mut result = DirectResult::new(mock, agent.clone(), format!("tool `{tool}` invoked"));
        result.metadata.insert("tool".into(), serde_json::Value::String(tool.to_string()));
        result.metadata.insert("params".into(), params.clone());
        Ok(result)
    }

    async fn inject_memory(&self, agent: &AgentName, content: &str, memory_kind: MemoryKind, mock: bool) -> Result<DirectResult, AdapterError> {
        self.known(agent)?;
        let mut result = DirectResult::new(mock, agent.clone(), content.to_string());
        result.metadata.insert(
            "memory_kind".into(),
            serde_json::to_value(memory_kind).expect("MemoryKind always serializes"),
        );
        Ok(result)
    }

    async fn broadcast(&self, from: &AgentName, to: &[AgentName], message: &str, mock: bool) -> Result<Vec<DirectResult>, AdapterError> {
        self.known(from)?;
        let mut results = Vec::with_capacity(to.len());
        for target in to {
            results.push(self.simulate_message(from, target, message, mock).await?);
        }
        Ok(results)
    }

    async fn spoof_identity(&self, real: &AgentName, spoofed: &AgentName, to: &AgentName, message: &str, mock: bool) -> Result<DirectResult, AdapterError> {
        self.known(real)?;
        self.known(to)?;
        if mock {
            return Ok(DirectResult::new(true, to.clone(), message.to_string()));
        }
        let delivered = self.hook_chain.apply(Message::new(spoofed.clone(), to.clone(), message))?;
        self.record_sent(real);
        Ok(DirectResult::new(false, to.clone(), delivered.content))
    }

    async fn resource_usage(&self, agent: Option<&AgentName>) -> ResourceUsage {
        let usage = self.usage.lock().expect("usage lock poisoned");
        match agent {
            Some(name) => usage.get(name).cloned().unwrap_or_else(|| ResourceUsage {
                agent: Some(name.clone()),
                messages_sent: 0,
                tokens_estimate: 0,
            }),
            None => {
                let total_messages = usage.values().map(|u| u.messages_sent).sum();
                let total_tokens = usage.values().map(|u| u.tokens_estimate).sum();
                ResourceUsage {
                    agent: None,
                    messages_sent: total_messages,
                    tokens_estimate: total_tokens,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_agent_adapter() -> MockAdapter {
        MockAdapter::new(vec![AgentInfo::new("A", "sender"), AgentInfo::new("B", "receiver")])
            .with_script(vec![(AgentName::new("A"), AgentName::new("B"), "hello".to_string())])
    }

    #[tokio::test]
    async fn unknown_agent_is_rejected() {
        let adapter = two_agent_adapter();
        let err = MASAdapter::agent(&adapter, &AgentName::new("ghost")).await.unwrap_err();
        assert!(matches!(err, AdapterError::UnknownAgent(_)));
    }

    #[tokio::test]
    async fn run_workflow_with_no_hooks_delivers_unmodified() {
        let adapter = two_agent_adapter();
        let result = MASAdapter::run_workflow(&adapter, "hi", &WorkflowOptions::default()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].content, "hello");
    }

    #[tokio::test]
    async fn run_workflow_routes_through_registered_hooks() {
        let adapter = two_agent_adapter();
        MASAdapter::register_hook(&adapter, std::sync::Arc::new(|m: Message| Ok(m.with_content(format!("{} [MOD]", m.content)))));

        let result = MASAdapter::run_workflow(&adapter, "hi", &WorkflowOptions::default()).await.unwrap();
        assert_eq!(result.messages[0].content, "hello [MOD]");
        assert_eq!(result.output, "hello [MOD]");
    }

    #[tokio::test]
    async fn mock_chat_does_not_touch_usage() {
        let adapter = two_agent_adapter();
        MASAdapter::chat(&adapter, &AgentName::new("A"), "ping", None, true).await.unwrap();
        let usage = MASAdapter::resource_usage(&adapter, Some(&AgentName::new("A"))).await;
        assert_eq!(usage.messages_sent, 0);
    }

    #[tokio::test]
    async fn non_mock_simulate_message_updates_usage_and_applies_hooks() {
        let adapter = two_agent_adapter();
        MASAdapter::register_hook(&adapter, std::sync::Arc::new(|m: Message| Ok(m.with_content(m.content.to_uppercase()))));

        let result = MASAdapter::simulate_message(&adapter, &AgentName::new("A"), &AgentName::new("B"), "hi", false)
            .await
            .unwrap();
        assert_eq!(result.output, "HI");
        let usage = MASAdapter::resource_usage(&adapter, Some(&AgentName::new("A"))).await;
        assert_eq!(usage.messages_sent, 1);
    }

    #[tokio::test]
    async fn two_agent_topology_is_a_chain() {
        let adapter = two_agent_adapter();
        let topo = MASAdapter::topology(&adapter).await;
        assert_eq!(topo[&AgentName::new("A")], vec![AgentName::new("B")]);
    }
}
