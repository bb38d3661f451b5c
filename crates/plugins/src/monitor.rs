use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use masguard_core::{
    Alert, AgentStepLog, KnownVulnerability, MonitorName, RiskProfile, TestResult,
};

use crate::error::PluginError;

/// `{name, riskType, description}` (§4.5).
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub name: MonitorName,
    pub risk_type: String,
    pub description: String,
}

/// The private state a [`Monitor`] accumulates across a run: the known
/// vulnerabilities fed in by a linked test's failures, and the alerts it has
/// emitted so far. Never read by anything other than the monitor itself and
/// [`Monitor::risk_profile`] (§3: "computed on demand, never stored" refers
/// to the profile, not this raw state).
#[derive(Debug, Default)]
pub struct MonitorState {
    pub known_vulnerabilities: Vec<KnownVulnerability>,
    pub alerts: Vec<Alert>,
}

/// A stateful consumer of the trace event stream that may emit [`Alert`]s
/// (§4.5, C7).
///
/// `process` is pure with respect to other monitors — the coordinator
/// guarantees sequential calls per monitor (§5) — but may mutate this
/// monitor's own `state` via the `&self` methods below, which all take a
/// `Mutex` rather than `&mut self` so a monitor can be shared behind an
/// `Arc` in the coordinator's registry.
#[async_trait]
pub trait Monitor: Send + Sync {
    fn info(&self) -> MonitorInfo;

    /// Consume one step, returning at most one [`Alert`] — a monitor that
    /// would otherwise emit several for one step must choose the most
    /// severe (§4.5). Returns `Err` if the monitor cannot complete its own
    /// analysis; the coordinator logs and skips it (§7 `MonitorFailure`).
    async fn process(&self, step: &AgentStepLog) -> Result<Option<Alert>, PluginError>;

    /// Accept configuration. A no-op default for monitors with nothing to
    /// configure.
    fn configure(&self, _opts: &HashMap<String, serde_json::Value>) {}

    /// The state `reset`, `set_test_context`, and `risk_profile` operate on.
    fn state(&self) -> &Mutex<MonitorState>;

    /// Clear accumulated state, including alert history, between runs
    /// (§4.5, invariant 5: called exactly once before the first `process`
    /// of a run).
    fn reset(&self) {
        let mut state = self.state().lock().unwrap();
        state.known_vulnerabilities.clear();
        state.alerts.clear();
    }

    /// Record a linked test's failed cases as known vulnerabilities.
    /// Calling this twice with the same `test_result` does not double-count
    /// (§8 idempotence).
    fn set_test_context(&self, test_result: &TestResult) {
        let mut state = self.state().lock().unwrap();
        for case in test_result.details.iter().filter(|c| !c.passed) {
            let vuln = KnownVulnerability {
                test_name: test_result.risk_name.clone(),
                case_name: case.case_name.clone(),
                severity: case.severity,
                description: case
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("case {} failed", case.case_name)),
            };
            if !state.known_vulnerabilities.contains(&vuln) {
                state.known_vulnerabilities.push(vuln);
            }
        }
    }

    /// Derive the risk level and recommendations from accumulated state
    /// (§4.5). Recomputed on every call, never cached.
    fn risk_profile(&self) -> RiskProfile {
        let state = self.state().lock().unwrap();
        let alert_count = u32::try_from(state.alerts.len()).unwrap_or(u32::MAX);
        RiskProfile::compute(state.known_vulnerabilities.clone(), alert_count)
    }

    /// Record `alert` into this monitor's own history and hand it back to
    /// the caller, who returns it from `process`. Concrete monitors should
    /// route every emitted alert through this helper so `risk_profile`'s
    /// alert count stays accurate.
    fn emit(&self, alert: Alert) -> Option<Alert> {
        self.state().lock().unwrap().alerts.push(alert.clone());
        Some(alert)
    }
}

#[cfg(test)]
mod tests {
    use masguard_core::{AlertSeverity, CaseResult, RecommendedAction, RiskLevel, Severity, StepType};

    use super::*;

    struct StubMonitor {
        state: Mutex<MonitorState>,
    }

    impl StubMonitor {
        fn new() -> Self {
            Self {
                state: Mutex::new(MonitorState::default()),
            }
        }
    }

    #[async_trait]
    impl Monitor for StubMonitor {
        fn info(&self) -> MonitorInfo {
            MonitorInfo {
                name: MonitorName::new("stub"),
                risk_type: "stub".to_string(),
                description: "test double".to_string(),
            }
        }

        async fn process(&self, _step: &AgentStepLog) -> Result<Option<Alert>, PluginError> {
            Ok(self.emit(Alert::new(AlertSeverity::Warning, "stub", "hit", RecommendedAction::Log)))
        }

        fn state(&self) -> &Mutex<MonitorState> {
            &self.state
        }
    }

    fn step() -> AgentStepLog {
        AgentStepLog::new("a", StepType::Respond, serde_json::json!("hi"))
    }

    #[tokio::test]
    async fn process_accumulates_alert_count_into_risk_profile() {
        let monitor = StubMonitor::new();
        for _ in 0..3 {
            monitor.process(&step()).await.unwrap();
        }
        assert_eq!(monitor.risk_profile().alert_count, 3);
        assert_eq!(monitor.risk_profile().risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn more_than_five_alerts_is_critical() {
        let monitor = StubMonitor::new();
        for _ in 0..6 {
            monitor.process(&step()).await.unwrap();
        }
        assert_eq!(monitor.risk_profile().risk_level, RiskLevel::Critical);
    }

    #[test]
    fn reset_clears_alerts_and_vulnerabilities() {
        let monitor = StubMonitor::new();
        monitor.state().lock().unwrap().alerts.push(Alert::new(AlertSeverity::Info, "x", "y", RecommendedAction::Log));
        monitor.reset();
        assert_eq!(monitor.risk_profile().alert_count, 0);
    }

    #[test]
    fn set_test_context_is_idempotent() {
        let monitor = StubMonitor::new();
        let result = TestResult::from_cases(
            "risk-x",
            vec![CaseResult::failed("c1", Severity::High, serde_json::json!({"why": "leaked"}))],
        );
        monitor.set_test_context(&result);
        monitor.set_test_context(&result);
        assert_eq!(monitor.risk_profile().known_vulnerabilities.len(), 1);
        assert_eq!(monitor.risk_profile().risk_level, RiskLevel::High);
    }
}
