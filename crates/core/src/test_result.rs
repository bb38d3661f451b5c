use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// The outcome of running one [`TestCase`](crate::TestCase) against the
/// intermediary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub severity: Severity,
    /// Populated when the case crashed rather than simply failing its
    /// expectation (`TestCaseFailure`, §7) — the test still continues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CaseResult {
    #[must_use]
    pub fn passed(case_name: impl Into<String>, severity: Severity) -> Self {
        Self {
            case_name: case_name.into(),
            passed: true,
            severity,
            error: None,
            details: None,
        }
    }

    #[must_use]
    pub fn failed(case_name: impl Into<String>, severity: Severity, details: impl Into<serde_json::Value>) -> Self {
        Self {
            case_name: case_name.into(),
            passed: false,
            severity,
            error: None,
            details: Some(details.into()),
        }
    }

    #[must_use]
    pub fn crashed(case_name: impl Into<String>, severity: Severity, error: impl Into<String>) -> Self {
        Self {
            case_name: case_name.into(),
            passed: false,
            severity,
            error: Some(error.into()),
            details: None,
        }
    }
}

/// Per-severity tally of failed cases, in the same four buckets as
/// [`Severity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl SeveritySummary {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.low + self.medium + self.high + self.critical
    }
}

/// The aggregated result of running all cases for one risk test (§4.7
/// step 3).
///
/// Invariant: `passed == (failed_cases == 0)` and `total_cases == details.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub risk_name: String,
    pub passed: bool,
    pub total_cases: usize,
    pub failed_cases: usize,
    pub details: Vec<CaseResult>,
    pub severity_summary: SeveritySummary,
}

impl TestResult {
    /// Aggregate a completed batch of `CaseResult`s into a `TestResult`,
    /// maintaining the `passed <=> failed_cases == 0` invariant (§8.4) and
    /// counting failed cases into `severity_summary` by their *original*
    /// case severity.
    #[must_use]
    pub fn from_cases(risk_name: impl Into<String>, details: Vec<CaseResult>) -> Self {
        let mut severity_summary = SeveritySummary::default();
        let failed_cases = details
            .iter()
            .filter(|c| {
                if !c.passed {
                    severity_summary.record(c.severity);
                }
                !c.passed
            })
            .count();

        Self {
            risk_name: risk_name.into(),
            passed: failed_cases == 0,
            total_cases: details.len(),
            failed_cases,
            details,
            severity_summary,
        }
    }
}
