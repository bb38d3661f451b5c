use std::sync::Arc;

use masguard_adapter::DynMASAdapter;
use masguard_plugins::{Monitor, RiskTest};

use crate::config::SafetyConfig;
use crate::error::SafetyError;
use crate::registry::{MonitorConstructor, RiskTestConstructor};
use crate::safety::Safety;

/// Fluent builder for constructing a [`Safety`] coordinator.
///
/// At minimum, an adapter must be supplied. Monitor and risk-test
/// constructors are an explicit manifest (§9 "Plugin auto-discovery →
/// explicit manifest"): register each one by name, then `build()` —
/// failures to instantiate a single plugin are recorded and skipped rather
/// than failing the whole build (§4.8 "Monitor registry").
pub struct SafetyBuilder {
    adapter: Option<Arc<dyn DynMASAdapter>>,
    config: SafetyConfig,
    monitors: Vec<(String, MonitorConstructor)>,
    tests: Vec<(String, RiskTestConstructor)>,
}

impl SafetyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapter: None,
            config: SafetyConfig::default(),
            monitors: Vec::new(),
            tests: Vec::new(),
        }
    }

    #[must_use]
    pub fn adapter(mut self, adapter: Arc<dyn DynMASAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    #[must_use]
    pub fn config(mut self, config: SafetyConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a monitor constructor under `name`.
    #[must_use]
    pub fn monitor(mut self, name: impl Into<String>, constructor: impl Fn() -> Result<Box<dyn Monitor>, String> + Send + Sync + 'static) -> Self {
        self.monitors.push((name.into(), Arc::new(constructor)));
        self
    }

    /// Register a risk test constructor under `name`.
    #[must_use]
    pub fn test(mut self, name: impl Into<String>, constructor: impl Fn() -> Result<Box<dyn RiskTest>, String> + Send + Sync + 'static) -> Self {
        self.tests.push((name.into(), Arc::new(constructor)));
        self
    }

    /// Consume the builder and produce a configured [`Safety`].
    ///
    /// Returns [`SafetyError::Configuration`] if no adapter has been set.
    pub fn build(self) -> Result<Safety, SafetyError> {
        let adapter = self.adapter.ok_or_else(|| SafetyError::Configuration("adapter is required".to_string()))?;
        Ok(Safety::from_parts(adapter, self.config, self.monitors, self.tests))
    }
}

impl Default for SafetyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use masguard_adapter::{AgentInfo, MockAdapter};

    use super::*;

    #[test]
    fn build_without_adapter_is_a_configuration_error() {
        let err = SafetyBuilder::new().build().unwrap_err();
        assert!(matches!(err, SafetyError::Configuration(_)));
    }

    #[test]
    fn build_with_adapter_succeeds() {
        let adapter: Arc<dyn DynMASAdapter> = Arc::new(MockAdapter::new(vec![AgentInfo::new("a", "role")]));
        let safety = SafetyBuilder::new().adapter(adapter).build().unwrap();
        assert!(safety.instantiation_failures().is_empty());
        assert!(safety.available_tests().is_empty());
    }
}
