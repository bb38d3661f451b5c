use serde::{Deserialize, Serialize};

/// Severity of a [`TestCase`](crate::TestCase) or a known vulnerability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Severity of an [`Alert`](crate::Alert) emitted by a runtime monitor.
///
/// Distinct from [`Severity`]: an alert can never be "none" (a monitor that
/// decided there was nothing to report simply returns no alert), whereas a
/// [`JudgeSeverity`] can be `None` to represent "analyzed, found nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// Severity produced by a [`Judge`](crate::JudgeResult) content analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeSeverity {
    None,
    Info,
    Warning,
    Critical,
}

/// The advisory action recommended by a judge or monitor.
///
/// Per §1 Non-goals, `Block` is never enforced by the harness itself — it is
/// surfaced for an operator or the wrapping application to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    Log,
    Warn,
    Block,
}

/// The overall risk level derived for a monitor's [`RiskProfile`](crate::RiskProfile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&RecommendedAction::Block).unwrap(),
            "\"block\""
        );
    }
}
