use std::collections::HashMap;

use masguard_core::{Alert, RiskProfile, TestResult};
use serde::{Deserialize, Serialize};

/// `report().summary` (§4.8).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub tests_run: usize,
    pub tests_passed: usize,
    pub active_monitors: usize,
    pub total_alerts: usize,
    pub critical_alerts: usize,
}

/// `{testResults, riskProfiles, alerts, summary}` (§4.8 C11).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyReport {
    pub test_results: HashMap<String, TestResult>,
    pub risk_profiles: HashMap<String, RiskProfile>,
    pub alerts: Vec<Alert>,
    pub summary: ReportSummary,
}

/// Attached under `result.metadata.monitoringReport` by `runTask` (§4.8):
/// the alerts produced by *this* run, distinct from the coordinator's
/// session-wide alert list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringReport {
    pub alerts: Vec<Alert>,
    pub active_monitors: Vec<String>,
}
