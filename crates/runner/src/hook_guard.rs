use std::sync::Arc;

use masguard_adapter::DynMASAdapter;

/// Clears the adapter's hook chain when dropped, so a runner's installed
/// hooks are removed on every exit path — normal return, early return, or
/// unwind (§4.4, §5 "Cleanup").
///
/// This clears the whole chain rather than tracking which specific hook
/// this runner added, on the assumption (stated in §5) that a given adapter
/// is driven by one runner at a time; nothing else should be racing to
/// install hooks concurrently on the same adapter.
pub struct HookGuard {
    adapter: Arc<dyn DynMASAdapter>,
}

impl HookGuard {
    #[must_use]
    pub fn new(adapter: Arc<dyn DynMASAdapter>) -> Self {
        Self { adapter }
    }
}

impl Drop for HookGuard {
    fn drop(&mut self) {
        self.adapter.clear_hooks();
    }
}
