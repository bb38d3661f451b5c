use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use masguard_core::Message;
use tracing::debug;

use crate::error::HookError;

/// A single mutating filter over a [`Message`]. Hooks are trusted
/// first-party code (§4.1): a hook that fails aborts the whole chain rather
/// than being swallowed.
pub type Hook = Arc<dyn Fn(Message) -> Result<Message, HookError> + Send + Sync>;

/// An ordered, mutating filter chain over inter-agent messages (§4.1).
///
/// `apply(m)` folds every registered hook over `m` in registration order —
/// there is no priority system. Readers (message handlers calling `apply`)
/// take an `Arc` snapshot of the hook list; writers (`register`/`clear`)
/// swap in a freshly cloned `Vec` wrapped in a new `Arc`. This copy-on-write
/// discipline (§5, §9) means a message mid-traversal never observes a
/// concurrent registration.
///
/// Hooks installed on an adapter are lazily wired: the first call to
/// `register` flips [`HookChain::is_wired`] to `true`, at which point the
/// adapter should start routing every message through `apply`. `clear`
/// empties the hook list but does **not** un-wire — once wired, messages
/// keep flowing through the (now empty, effectively free) chain. This is a
/// deliberate choice so that consumers who never install a hook pay zero
/// overhead (§4.1).
#[derive(Default)]
pub struct HookChain {
    hooks: RwLock<Arc<Vec<Hook>>>,
    wired: AtomicBool,
}

impl HookChain {
    /// Create an empty, unwired chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(Arc::new(Vec::new())),
            wired: AtomicBool::new(false),
        }
    }

    /// Append a hook, wiring the chain if this is the first registration.
    pub fn register(&self, hook: Hook) {
        let mut guard = self.hooks.write().expect("hook chain lock poisoned");
        let mut next = (**guard).clone();
        next.push(hook);
        *guard = Arc::new(next);
        if !self.wired.swap(true, Ordering::AcqRel) {
            debug!("hook chain wired on first registration");
        }
    }

    /// Empty the hook list. Does **not** reset the wired flag (§4.1).
    pub fn clear(&self) {
        let mut guard = self.hooks.write().expect("hook chain lock poisoned");
        *guard = Arc::new(Vec::new());
    }

    /// `true` once `register` has been called at least once, even if
    /// `clear` has since emptied the list.
    #[must_use]
    pub fn is_wired(&self) -> bool {
        self.wired.load(Ordering::Acquire)
    }

    /// Take a stable snapshot of the currently registered hooks.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Hook>> {
        Arc::clone(&self.hooks.read().expect("hook chain lock poisoned"))
    }

    /// Apply every hook in registration order. On the first failure the
    /// chain aborts and propagates the error; mutations from earlier hooks
    /// in this call are discarded along with the rest (§4.1).
    pub fn apply(&self, message: Message) -> Result<Message, HookError> {
        let hooks = self.snapshot();
        let mut current = message;
        for hook in hooks.iter() {
            current = hook(current)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append_hook(suffix: &'static str) -> Hook {
        Arc::new(move |m: Message| Ok(m.with_content(format!("{}{suffix}", m.content))))
    }

    #[test]
    fn unwired_chain_is_identity() {
        let chain = HookChain::new();
        assert!(!chain.is_wired());
        let m = Message::new("a", "b", "hello");
        let out = chain.apply(m.clone()).unwrap();
        assert_eq!(out, m);
    }

    #[test]
    fn register_wires_and_applies_in_order() {
        let chain = HookChain::new();
        chain.register(append_hook("-1"));
        chain.register(append_hook("-2"));
        assert!(chain.is_wired());

        let out = chain.apply(Message::new("a", "b", "hello")).unwrap();
        assert_eq!(out.content, "hello-1-2");
    }

    #[test]
    fn clear_empties_but_stays_wired() {
        let chain = HookChain::new();
        chain.register(append_hook("-1"));
        chain.clear();
        assert!(chain.is_wired());

        let out = chain.apply(Message::new("a", "b", "hello")).unwrap();
        assert_eq!(out.content, "hello");
    }

    #[test]
    fn failing_hook_aborts_the_chain() {
        let chain = HookChain::new();
        chain.register(append_hook("-1"));
        chain.register(Arc::new(|_m: Message| Err(HookError::Failed("boom".into()))));
        chain.register(append_hook("-3"));

        let err = chain.apply(Message::new("a", "b", "hello")).unwrap_err();
        assert!(matches!(err, HookError::Failed(_)));
    }

    #[test]
    fn empty_interception_list_is_bit_identical() {
        let chain = HookChain::new();
        let m = Message::new("a", "b", "hello");
        assert_eq!(chain.apply(m.clone()).unwrap().content, m.content);
    }
}
