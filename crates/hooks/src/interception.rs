use std::sync::Arc;

use masguard_core::{AgentName, Message};

use crate::hook_chain::Hook;

/// A declarative, single-purpose hook: intercept messages from `source` to
/// `target` (or from `source` to anyone, if `target` is `None`) that pass
/// `condition`, and rewrite their content with `modifier`.
///
/// This is the primitive `InterceptingRunner` (§4.4) installs on the hook
/// chain for the duration of one run. It exists separately from a raw
/// [`Hook`] closure so the runner can log a structured `Intercept` step
/// (§3 `AgentStepLog`) every time `modifier` actually changes something.
#[derive(Clone)]
pub struct MessageInterception {
    pub source_agent: AgentName,
    pub target_agent: Option<AgentName>,
    modifier: Arc<dyn Fn(&str) -> String + Send + Sync>,
    condition: Arc<dyn Fn(&Message) -> bool + Send + Sync>,
}

impl MessageInterception {
    /// Intercept every message sent by `source_agent`, regardless of target.
    pub fn new(source_agent: impl Into<AgentName>, modifier: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            source_agent: source_agent.into(),
            target_agent: None,
            modifier: Arc::new(modifier),
            condition: Arc::new(|_| true),
        }
    }

    /// Narrow this interception to messages addressed to `target_agent`.
    #[must_use]
    pub fn with_target(mut self, target_agent: impl Into<AgentName>) -> Self {
        self.target_agent = Some(target_agent.into());
        self
    }

    /// Attach an additional predicate a message must satisfy to be rewritten.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Fn(&Message) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Arc::new(condition);
        self
    }

    /// Does this interception apply to `message`?
    #[must_use]
    pub fn matches(&self, message: &Message) -> bool {
        if message.from != self.source_agent {
            return false;
        }
        if let Some(target) = &self.target_agent {
            if &message.to != target {
                return false;
            }
        }
        (self.condition)(message)
    }

    fn rewrite(&self, message: &Message) -> String {
        (self.modifier)(&message.content)
    }
}

/// The result of running one [`Message`] through an ordered list of
/// [`MessageInterception`]s: the final message, plus one record per
/// interception whose rewrite actually changed the content.
pub struct InterceptionApplication {
    pub message: Message,
    pub records: Vec<InterceptionRecord>,
}

/// One logged rewrite: which interception fired, and what the content
/// looked like before and after.
///
/// Per §9's design note, `original` is **not** the content immediately
/// before this particular interception ran — it is the content the message
/// arrived with at the start of `apply_interceptions`, i.e. before the
/// whole chain. If two interceptions both match the same message, the
/// second record's `original` still shows the pre-chain text, not the
/// first interception's output. This is surprising but intentional: it is
/// what the reference behavior does, and callers (notably `AgentStepLog`
/// construction in the runner) must reproduce it rather than "fix" it.
pub struct InterceptionRecord {
    pub original: String,
    pub modified: String,
    pub source: AgentName,
    pub target: AgentName,
}

/// Run `message` through `interceptions` in order, applying every match.
///
/// Returns the fully-rewritten message together with a record for each
/// interception that changed the content (interceptions that match but
/// whose modifier is a no-op produce no record).
#[must_use]
pub fn apply_interceptions(message: Message, interceptions: &[MessageInterception]) -> InterceptionApplication {
    let pre_chain = message.content.clone();
    let mut current = message;
    let mut records = Vec::new();

    for interception in interceptions {
        if !interception.matches(&current) {
            continue;
        }
        let rewritten = interception.rewrite(&current);
        if rewritten == current.content {
            continue;
        }
        records.push(InterceptionRecord {
            original: pre_chain.clone(),
            modified: rewritten.clone(),
            source: current.from.clone(),
            target: current.to.clone(),
        });
        current = current.with_content(rewritten);
    }

    InterceptionApplication { message: current, records }
}

/// Wrap a [`MessageInterception`] as a plain [`Hook`] for installation on a
/// [`HookChain`](crate::HookChain) directly, for callers that don't need
/// the structured [`InterceptionRecord`] bookkeeping `apply_interceptions`
/// provides.
#[must_use]
pub fn as_hook(interception: MessageInterception) -> Hook {
    Arc::new(move |message: Message| {
        if interception.matches(&message) {
            let rewritten = interception.rewrite(&message);
            Ok(message.with_content(rewritten))
        } else {
            Ok(message)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_append_mod_suffix() {
        let interception = MessageInterception::new("A", |c| format!("{c} [MOD]")).with_target("B");
        let msg = Message::new("A", "B", "hello");

        let result = apply_interceptions(msg, std::slice::from_ref(&interception));
        assert_eq!(result.message.content, "hello [MOD]");
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].original, "hello");
        assert_eq!(result.records[0].modified, "hello [MOD]");
    }

    #[test]
    fn non_matching_target_is_untouched() {
        let interception = MessageInterception::new("A", |c| format!("{c} [MOD]")).with_target("C");
        let msg = Message::new("A", "B", "hello");

        let result = apply_interceptions(msg.clone(), std::slice::from_ref(&interception));
        assert_eq!(result.message.content, msg.content);
        assert!(result.records.is_empty());
    }

    #[test]
    fn second_interceptions_original_is_pre_chain_not_pre_self() {
        let first = MessageInterception::new("A", |c| format!("{c}-1"));
        let second = MessageInterception::new("A", |c| format!("{c}-2"));
        let msg = Message::new("A", "B", "hello");

        let result = apply_interceptions(msg, &[first, second]);
        assert_eq!(result.message.content, "hello-1-2");
        assert_eq!(result.records.len(), 2);
        // Both records report the original pre-chain text, not the
        // intermediate "hello-1" the second interception actually saw.
        assert_eq!(result.records[0].original, "hello");
        assert_eq!(result.records[1].original, "hello");
        assert_eq!(result.records[1].modified, "hello-1-2");
    }

    #[test]
    fn no_op_modifier_produces_no_record() {
        let interception = MessageInterception::new("A", |c| c.to_string());
        let msg = Message::new("A", "B", "hello");

        let result = apply_interceptions(msg, std::slice::from_ref(&interception));
        assert!(result.records.is_empty());
        assert_eq!(result.message.content, "hello");
    }

    #[test]
    fn as_hook_applies_matching_interception() {
        let interception = MessageInterception::new("A", |c| format!("{c}!"));
        let hook = as_hook(interception);
        let out = hook(Message::new("A", "B", "hi")).unwrap();
        assert_eq!(out.content, "hi!");
    }
}
