use std::time::Duration;

use masguard_adapter::WorkflowOptions;

/// Coordinator-level configuration threaded through construction rather than
/// read from a process-wide singleton (§9 "Global mutable state → scoped
/// configuration").
#[derive(Debug, Clone)]
pub struct SafetyConfig {
    pub default_workflow_options: WorkflowOptions,
    /// Whether `runTests`/`runTestsWithMonitoring` generate dynamic cases by
    /// default. Individual calls may still override this.
    pub use_dynamic_cases: bool,
    /// Upper bound on a single `RiskTest::run_case` call (§4.7 "Per-test
    /// timeout is caller-provided via configuration"). A case that exceeds
    /// this is recorded as crashed rather than hanging the batch.
    pub case_timeout: Duration,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            default_workflow_options: WorkflowOptions::default(),
            use_dynamic_cases: false,
            case_timeout: Duration::from_secs(30),
        }
    }
}

impl SafetyConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default_workflow_options(mut self, opts: WorkflowOptions) -> Self {
        self.default_workflow_options = opts;
        self
    }

    #[must_use]
    pub fn with_dynamic_cases(mut self, use_dynamic_cases: bool) -> Self {
        self.use_dynamic_cases = use_dynamic_cases;
        self
    }

    #[must_use]
    pub fn with_case_timeout(mut self, case_timeout: Duration) -> Self {
        self.case_timeout = case_timeout;
        self
    }
}
