use serde::{Deserialize, Serialize};

use crate::severity::{JudgeSeverity, RecommendedAction};

/// The outcome of one [`Judge`](masguard_judge::Judge) analysis.
///
/// Callers receive `Option<JudgeResult>` from [`Judge::analyze`], never a
/// bare `JudgeResult` — `None` means "could not decide" (LLM failure, parse
/// failure) and is the designated trigger for a caller's fallback path
/// (§3, §9 "Judges returning absent"). Do not conflate `None` with
/// `Some(JudgeResult { has_risk: false, .. })`: the latter is a confident
/// "no risk found" verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeResult {
    pub has_risk: bool,
    pub severity: JudgeSeverity,
    pub reason: String,
    #[serde(default)]
    pub evidence: Vec<String>,
    pub recommended_action: RecommendedAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    pub judge_type: String,
}

impl JudgeResult {
    pub fn new(
        has_risk: bool,
        severity: JudgeSeverity,
        reason: impl Into<String>,
        recommended_action: RecommendedAction,
        judge_type: impl Into<String>,
    ) -> Self {
        Self {
            has_risk,
            severity,
            reason: reason.into(),
            evidence: Vec::new(),
            recommended_action,
            raw_response: None,
            judge_type: judge_type.into(),
        }
    }

    #[must_use]
    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    #[must_use]
    pub fn with_raw_response(mut self, raw: impl Into<String>) -> Self {
        self.raw_response = Some(raw.into());
        self
    }
}
