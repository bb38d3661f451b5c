use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::AgentName;

/// An inter-agent message flowing through the [`HookChain`](masguard_hooks::HookChain).
///
/// Immutable by convention: hooks never mutate a `Message` in place, they
/// produce a new one (§4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The sending agent.
    pub from: AgentName,
    /// The receiving agent.
    pub to: AgentName,
    /// The message body.
    pub content: String,
    /// Arbitrary extra data carried alongside the message (tool calls,
    /// citations, provider-specific metadata, ...).
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Message {
    /// Create a new message with empty `extra`.
    pub fn new(from: impl Into<AgentName>, to: impl Into<AgentName>, content: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            content: content.into(),
            extra: HashMap::new(),
        }
    }

    /// Return a copy of this message with new content, preserving `from`/`to`/`extra`.
    ///
    /// This is the shape every hook in the chain must produce (§4.1: "hooks
    /// produce a new message").
    #[must_use]
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            content: content.into(),
            extra: self.extra.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_content_preserves_identity() {
        let m = Message::new("a", "b", "hello");
        let m2 = m.with_content("hello [MOD]");
        assert_eq!(m2.from, m.from);
        assert_eq!(m2.to, m.to);
        assert_eq!(m2.content, "hello [MOD]");
    }

    #[test]
    fn message_serde_roundtrip() {
        let m = Message::new("a", "b", "hi");
        let json = serde_json::to_string(&m).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
