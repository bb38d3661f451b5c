use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use masguard_adapter::{DynMASAdapter, WorkflowOptions, WorkflowResult};
use masguard_core::{AgentStepLog, Alert, MonitorName, RiskName, RiskProfile, TestResult};
use masguard_plugins::{Monitor, RiskTest};
use tracing::warn;

use crate::config::SafetyConfig;
use crate::intermediary::Intermediary;
use crate::monitoring::MonitoringMode;
use crate::registry::{MonitorConstructor, RiskTestConstructor};
use crate::report::{MonitoringReport, ReportSummary, SafetyReport};

/// The outcome of looking up one test/monitor by name: either it ran, or
/// the name was unknown (§4.8: `runTests` never raises, it reports unknown
/// names structurally).
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Completed(T),
    Unknown { error: String, available: Vec<String> },
}

/// The per-case monitor evaluation attached by `runTestsWithMonitoring`.
pub type MonitorEvaluations = HashMap<String, HashMap<String, serde_json::Value>>;

/// `runTestsWithMonitoring`'s per-test payload: the test result plus, for
/// every failed case whose test has a linked monitor, that monitor's
/// secondary evaluation of the case's response.
#[derive(Debug, Clone)]
pub struct MonitoredTestResult {
    pub result: TestResult,
    pub monitor_evaluations: MonitorEvaluations,
}

/// The L3 coordinator (C10): owns the monitor and risk-test registries,
/// drives pre-deployment test runs, and fans the runtime event stream out
/// to active monitors (§4.8).
pub struct Safety {
    intermediary: Intermediary,
    config: SafetyConfig,
    monitors: HashMap<MonitorName, Arc<dyn Monitor>>,
    tests: HashMap<RiskName, Arc<dyn RiskTest>>,
    active_monitors: Mutex<HashSet<MonitorName>>,
    alerts: Mutex<Vec<Alert>>,
    test_results: Mutex<HashMap<String, TestResult>>,
    /// Plugins that failed to instantiate at construction time; the others
    /// remain usable (§4.8 "Monitor registry").
    instantiation_failures: Vec<String>,
}

impl Safety {
    pub(crate) fn from_parts(
        adapter: Arc<dyn DynMASAdapter>,
        config: SafetyConfig,
        monitor_constructors: Vec<(String, MonitorConstructor)>,
        test_constructors: Vec<(String, RiskTestConstructor)>,
    ) -> Self {
        let mut monitors = HashMap::new();
        let mut tests = HashMap::new();
        let mut instantiation_failures = Vec::new();

        for (name, constructor) in monitor_constructors {
            match constructor() {
                Ok(monitor) => {
                    monitors.insert(MonitorName::new(name), Arc::from(monitor));
                }
                Err(err) => {
                    warn!(plugin = %name, error = %err, "failed to instantiate monitor, skipping");
                    instantiation_failures.push(format!("monitor {name}: {err}"));
                }
            }
        }

        for (name, constructor) in test_constructors {
            match constructor() {
                Ok(test) => {
                    tests.insert(RiskName::new(name), Arc::from(test));
                }
                Err(err) => {
                    warn!(plugin = %name, error = %err, "failed to instantiate risk test, skipping");
                    instantiation_failures.push(format!("test {name}: {err}"));
                }
            }
        }

        Self {
            intermediary: Intermediary::new(adapter),
            config,
            monitors,
            tests,
            active_monitors: Mutex::new(HashSet::new()),
            alerts: Mutex::new(Vec::new()),
            test_results: Mutex::new(HashMap::new()),
            instantiation_failures,
        }
    }

    #[must_use]
    pub fn instantiation_failures(&self) -> &[String] {
        &self.instantiation_failures
    }

    #[must_use]
    pub fn intermediary(&self) -> &Intermediary {
        &self.intermediary
    }

    #[must_use]
    pub fn available_tests(&self) -> Vec<String> {
        self.tests.keys().map(ToString::to_string).collect()
    }

    /// `runTests(names)` (§4.8). Unknown names yield `Outcome::Unknown`
    /// without aborting the rest of the batch.
    pub async fn run_tests(&self, names: &[RiskName]) -> HashMap<String, Outcome<TestResult>> {
        let mut out = HashMap::new();
        for name in names {
            let key = name.to_string();
            let Some(test) = self.tests.get(name) else {
                out.insert(key.clone(), self.unknown_test(&key));
                continue;
            };
            let result = test
                .run(self.intermediary.adapter(), self.config.use_dynamic_cases, None, self.config.case_timeout)
                .await;
            self.test_results.lock().unwrap().insert(key.clone(), result.clone());
            out.insert(key, Outcome::Completed(result));
        }
        out
    }

    /// `runTestsWithMonitoring(names)` (§4.8): as `runTests`, plus a
    /// secondary monitor evaluation of every failed case whose test
    /// declares a `linkedMonitor`.
    pub async fn run_tests_with_monitoring(&self, names: &[RiskName]) -> HashMap<String, Outcome<MonitoredTestResult>> {
        let mut out = HashMap::new();
        for name in names {
            let key = name.to_string();
            let Some(test) = self.tests.get(name) else {
                out.insert(key.clone(), self.unknown_monitored_test(&key));
                continue;
            };

            let result = test
                .run(self.intermediary.adapter(), self.config.use_dynamic_cases, None, self.config.case_timeout)
                .await;
            self.test_results.lock().unwrap().insert(key.clone(), result.clone());

            let mut monitor_evaluations = MonitorEvaluations::new();
            if let Some(monitor_name) = test.linked_monitor() {
                if let Some(monitor) = self.monitors.get(&monitor_name) {
                    for case in result.details.iter().filter(|c| !c.passed) {
                        let response = case
                            .details
                            .as_ref()
                            .and_then(|d| d.get("response"))
                            .and_then(serde_json::Value::as_str)
                            .unwrap_or_default();
                        let evaluation = test.evaluate_with_monitor(response, monitor.as_ref()).await;
                        monitor_evaluations.insert(case.case_name.clone(), evaluation);
                    }
                }
            }

            out.insert(key, Outcome::Completed(MonitoredTestResult { result, monitor_evaluations }));
        }
        out
    }

    fn unknown_test<T>(&self, name: &str) -> Outcome<T> {
        Outcome::Unknown {
            error: format!("unknown test: {name}"),
            available: self.available_tests(),
        }
    }

    fn unknown_monitored_test(&self, name: &str) -> Outcome<MonitoredTestResult> {
        self.unknown_test(name)
    }

    /// `startMonitoring(mode, selected?)` (§4.8, §5).
    pub fn start_monitoring(&self, mode: MonitoringMode, selected: Option<&[MonitorName]>) {
        let mut active = self.active_monitors.lock().unwrap();
        active.clear();
        match mode {
            MonitoringMode::All => active.extend(self.monitors.keys().cloned()),
            MonitoringMode::Manual => {
                if let Some(selected) = selected {
                    active.extend(selected.iter().cloned());
                }
            }
        }
    }

    /// `startInformedMonitoring(testResults?)` (§4.8): activates every
    /// monitor, then seeds each linked monitor's known vulnerabilities from
    /// the given (or previously recorded) test results.
    pub fn start_informed_monitoring(&self, test_results: Option<&HashMap<String, TestResult>>) {
        self.start_monitoring(MonitoringMode::All, None);

        let owned;
        let results: &HashMap<String, TestResult> = match test_results {
            Some(results) => results,
            None => {
                owned = self.test_results.lock().unwrap().clone();
                &owned
            }
        };

        for (test_name, result) in results {
            let Some(test) = self.tests.get(&RiskName::new(test_name.clone())) else {
                continue;
            };
            let Some(monitor_name) = test.linked_monitor() else {
                continue;
            };
            if let Some(monitor) = self.monitors.get(&monitor_name) {
                monitor.set_test_context(result);
            }
        }
    }

    /// `runTask(task, opts) → WorkflowResult` (§4.8): drives `task` through
    /// a Monitored runner whose stream callback is this coordinator's
    /// `processEvent`, attaching a per-run monitoring report.
    pub async fn run_task(&self, task: &str, opts: &WorkflowOptions) -> WorkflowResult {
        let active: Vec<MonitorName> = self.active_monitors.lock().unwrap().iter().cloned().collect();
        for name in &active {
            if let Some(monitor) = self.monitors.get(name) {
                monitor.reset();
            }
        }

        let collected: Arc<Mutex<Vec<AgentStepLog>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&collected);
        let callback = Arc::new(move |step: &AgentStepLog| sink.lock().unwrap().push(step.clone()));

        let runner = self.intermediary.monitored_runner(Some(callback));
        let mut result = match runner.run(task, opts).await {
            Ok(result) => result,
            Err(err) => WorkflowResult::failure(err.to_string()),
        };

        let steps = collected.lock().unwrap().clone();
        let mut run_alerts = Vec::new();
        for step in &steps {
            run_alerts.extend(self.process_event(step, &active).await);
        }

        self.alerts.lock().unwrap().extend(run_alerts.iter().cloned());

        let report = MonitoringReport {
            alerts: run_alerts,
            active_monitors: active.iter().map(ToString::to_string).collect(),
        };
        result.metadata.insert(
            "monitoringReport".to_string(),
            serde_json::to_value(&report).expect("MonitoringReport always serializes"),
        );

        result
    }

    /// `processEvent(step)` (§4.8): fan out to every active monitor,
    /// logging and skipping one that fails rather than aborting the rest
    /// (§7 `MonitorFailure`).
    async fn process_event(&self, step: &AgentStepLog, active: &[MonitorName]) -> Vec<Alert> {
        let mut alerts = Vec::new();
        for name in active {
            let Some(monitor) = self.monitors.get(name) else {
                continue;
            };
            match monitor.process(step).await {
                Ok(Some(alert)) => {
                    let alert = alert.stamped();
                    if alert.recommended_action == masguard_core::RecommendedAction::Block {
                        tracing::error!(monitor = %name, "alert recommends blocking; no blocking is performed by the harness");
                    }
                    alerts.push(alert);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(monitor = %name, error = %err, "monitor failed to process step, skipping");
                }
            }
        }
        alerts
    }

    /// `report()` (§4.8, C11): aggregate every recorded test result, every
    /// registered monitor's current risk profile, and the session alert
    /// list.
    #[must_use]
    pub fn report(&self) -> SafetyReport {
        let test_results = self.test_results.lock().unwrap().clone();
        let alerts = self.alerts.lock().unwrap().clone();
        let risk_profiles: HashMap<String, RiskProfile> =
            self.monitors.iter().map(|(name, monitor)| (name.to_string(), monitor.risk_profile())).collect();

        let tests_passed = test_results.values().filter(|r| r.passed).count();
        let critical_alerts = alerts.iter().filter(|a| a.severity == masguard_core::AlertSeverity::Critical).count();

        let summary = ReportSummary {
            tests_run: test_results.len(),
            tests_passed,
            active_monitors: self.active_monitors.lock().unwrap().len(),
            total_alerts: alerts.len(),
            critical_alerts,
        };

        SafetyReport {
            test_results,
            risk_profiles,
            alerts,
            summary,
        }
    }
}
