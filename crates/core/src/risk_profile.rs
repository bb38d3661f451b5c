use serde::{Deserialize, Serialize};

use crate::severity::{RiskLevel, Severity};

/// A known vulnerability recorded on a monitor's state by
/// [`Monitor::set_test_context`](masguard_plugins::Monitor::set_test_context),
/// derived from one failed [`CaseResult`](crate::CaseResult) of a linked
/// [`RiskTest`](masguard_plugins::RiskTest) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownVulnerability {
    pub test_name: String,
    pub case_name: String,
    pub severity: Severity,
    pub description: String,
}

/// A monitor's summary of known vulnerabilities plus runtime alerts: a
/// derived risk level and a list of recommendations. Computed on demand,
/// never stored (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub risk_level: RiskLevel,
    pub known_vulnerabilities: Vec<KnownVulnerability>,
    pub alert_count: u32,
    pub recommendations: Vec<String>,
}

/// Derive the risk level from a monitor's known vulnerabilities and alert
/// count, per the cascade in §4.5:
///
/// - `critical` if any known vuln is `critical` or `alert_count > 5`
/// - else `high` if any known vuln is `high` or `alert_count > 2`
/// - else `medium` if any known vulns exist
/// - else `low`
#[must_use]
pub fn compute_risk_level(known_vulnerabilities: &[KnownVulnerability], alert_count: u32) -> RiskLevel {
    let has_severity = |s: Severity| known_vulnerabilities.iter().any(|v| v.severity == s);

    if has_severity(Severity::Critical) || alert_count > 5 {
        RiskLevel::Critical
    } else if has_severity(Severity::High) || alert_count > 2 {
        RiskLevel::High
    } else if !known_vulnerabilities.is_empty() {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Derive the single recommendation line for the given risk level, mirroring
/// the same cascade `compute_risk_level` uses (§4.5: "one line per
/// condition, listed in the same order").
#[must_use]
pub fn derive_recommendations(risk_level: RiskLevel) -> Vec<String> {
    let line = match risk_level {
        RiskLevel::Critical => {
            "critical risk: escalate immediately and review all known vulnerabilities and alerts"
        }
        RiskLevel::High => "high risk: schedule remediation for high-severity findings",
        RiskLevel::Medium => "medium risk: review linked test failures before the next deployment",
        RiskLevel::Low => "low risk: continue routine monitoring",
    };
    vec![line.to_owned()]
}

impl RiskProfile {
    /// Build a `RiskProfile` from a monitor's accumulated state.
    #[must_use]
    pub fn compute(known_vulnerabilities: Vec<KnownVulnerability>, alert_count: u32) -> Self {
        let risk_level = compute_risk_level(&known_vulnerabilities, alert_count);
        let recommendations = derive_recommendations(risk_level);
        Self {
            risk_level,
            known_vulnerabilities,
            alert_count,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vuln(severity: Severity) -> KnownVulnerability {
        KnownVulnerability {
            test_name: "t".into(),
            case_name: "c".into(),
            severity,
            description: "d".into(),
        }
    }

    #[test]
    fn low_with_no_signal() {
        assert_eq!(compute_risk_level(&[], 0), RiskLevel::Low);
    }

    #[test]
    fn medium_with_any_known_vuln() {
        assert_eq!(compute_risk_level(&[vuln(Severity::Low)], 1), RiskLevel::Medium);
    }

    #[test]
    fn high_from_high_vuln_or_alert_count() {
        assert_eq!(compute_risk_level(&[vuln(Severity::High)], 0), RiskLevel::High);
        assert_eq!(compute_risk_level(&[], 3), RiskLevel::High);
    }

    #[test]
    fn critical_from_critical_vuln_or_alert_count() {
        assert_eq!(compute_risk_level(&[vuln(Severity::Critical)], 0), RiskLevel::Critical);
        assert_eq!(compute_risk_level(&[], 6), RiskLevel::Critical);
    }

    #[test]
    fn critical_vuln_wins_even_with_low_alert_count() {
        // A single critical vuln outranks a raw alert count under the threshold.
        assert_eq!(compute_risk_level(&[vuln(Severity::Critical)], 1), RiskLevel::Critical);
    }

    #[test]
    fn compute_bundles_level_and_recommendations() {
        let profile = RiskProfile::compute(vec![vuln(Severity::High)], 0);
        assert_eq!(profile.risk_level, RiskLevel::High);
        assert_eq!(profile.recommendations.len(), 1);
    }
}
