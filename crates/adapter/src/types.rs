use std::collections::HashMap;

use masguard_core::{AgentName, Message};
use serde::{Deserialize, Serialize};

/// Static description of one agent known to the adapter (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: AgentName,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl AgentInfo {
    #[must_use]
    pub fn new(name: impl Into<AgentName>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            system_prompt: None,
            tools: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = String>) -> Self {
        self.tools = tools.into_iter().collect();
        self
    }
}

/// An opaque handle to a live agent, resolved by name via `MASAdapter::agent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentHandle {
    pub name: AgentName,
}

/// Options accepted by `runWorkflow` (§4.2). The harness does not define a
/// closed set of knobs; `extra` carries framework-specific options through
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowOptions {
    #[serde(default)]
    pub max_rounds: Option<u32>,
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// The outcome of `runWorkflow` (§4.2, §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub success: bool,
    pub output: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowResult {
    #[must_use]
    pub fn success(output: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            success: true,
            output: output.into(),
            messages,
            metadata: HashMap::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            messages: Vec::new(),
            metadata: HashMap::new(),
            error: Some(error.into()),
        }
    }
}

/// Which kind of agent memory an `injectMemory` call targets (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Context,
    System,
}

/// Shape-correct stand-in returned by every direct-manipulation primitive.
///
/// Each primitive accepts `mock: bool`; when `true` the adapter must return
/// this shape without touching agent state or spending LLM calls (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectResult {
    pub mock: bool,
    pub agent: AgentName,
    pub output: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl DirectResult {
    #[must_use]
    pub fn new(mock: bool, agent: impl Into<AgentName>, output: impl Into<String>) -> Self {
        Self {
            mock,
            agent: agent.into(),
            output: output.into(),
            metadata: HashMap::new(),
        }
    }
}

/// Resource usage snapshot returned by `resourceUsage(agent?)` (§4.2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub agent: Option<AgentName>,
    pub messages_sent: u64,
    pub tokens_estimate: u64,
}
