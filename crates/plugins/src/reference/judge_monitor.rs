use std::sync::Mutex;

use async_trait::async_trait;
use masguard_core::{Alert, AgentStepLog, AlertSeverity, JudgeResult, JudgeSeverity, MonitorName, RecommendedAction};
use masguard_judge::Judge;
use tracing::warn;

use crate::error::PluginError;
use crate::monitor::{Monitor, MonitorInfo, MonitorState};

/// A [`Monitor`] whose primary analysis is a [`Judge`], falling back to a
/// fixed keyword rule exactly when the judge returns absent (§4.6, §8
/// Scenario 4).
pub struct JudgeBackedMonitor {
    name: MonitorName,
    risk_type: String,
    description: String,
    judge: Box<dyn Judge>,
    fallback_keywords: Vec<String>,
    state: Mutex<MonitorState>,
}

impl JudgeBackedMonitor {
    #[must_use]
    pub fn new(
        name: impl Into<MonitorName>,
        risk_type: impl Into<String>,
        description: impl Into<String>,
        judge: Box<dyn Judge>,
        fallback_keywords: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            risk_type: risk_type.into(),
            description: description.into(),
            judge,
            fallback_keywords,
            state: Mutex::new(MonitorState::default()),
        }
    }

    fn alert_from_judge(&self, result: JudgeResult) -> Option<Alert> {
        if !result.has_risk {
            return None;
        }
        let severity = match result.severity {
            JudgeSeverity::Critical => AlertSeverity::Critical,
            JudgeSeverity::Warning => AlertSeverity::Warning,
            JudgeSeverity::Info | JudgeSeverity::None => AlertSeverity::Info,
        };
        self.emit(
            Alert::new(severity, self.risk_type.clone(), result.reason, result.recommended_action)
                .with_evidence("judge_type", result.judge_type),
        )
    }

    fn alert_from_fallback(&self, content: &str) -> Option<Alert> {
        let lower = content.to_lowercase();
        let hits: Vec<&String> = self.fallback_keywords.iter().filter(|k| lower.contains(k.to_lowercase().as_str())).collect();
        if hits.is_empty() {
            return None;
        }
        let matched = hits.into_iter().cloned().collect::<Vec<_>>().join(", ");
        self.emit(Alert::new(
            AlertSeverity::Warning,
            self.risk_type.clone(),
            format!("fallback keyword rule matched: {matched}"),
            RecommendedAction::Warn,
        ))
    }
}

#[async_trait]
impl Monitor for JudgeBackedMonitor {
    fn info(&self) -> MonitorInfo {
        MonitorInfo {
            name: self.name.clone(),
            risk_type: self.risk_type.clone(),
            description: self.description.clone(),
        }
    }

    async fn process(&self, step: &AgentStepLog) -> Result<Option<Alert>, PluginError> {
        let content = step.content_as_str();
        match self.judge.analyze(&content, None).await {
            Some(result) => Ok(self.alert_from_judge(result)),
            None => {
                warn!(monitor = %self.name, "judge returned absent, falling back to keyword rule");
                Ok(self.alert_from_fallback(&content))
            }
        }
    }

    fn state(&self) -> &Mutex<MonitorState> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use masguard_core::StepType;
    use masguard_judge::{FailingLlmClient, HeuristicJudge, LlmJudge, MockLlmClient};
    use std::sync::Arc;

    use super::*;

    fn step(content: &str) -> AgentStepLog {
        AgentStepLog::new("a", StepType::Respond, serde_json::json!(content))
    }

    #[tokio::test]
    async fn judge_with_risk_emits_alert() {
        let judge = LlmJudge::new(
            Arc::new(MockLlmClient::with_response(
                r#"{"has_risk": true, "severity": "warning", "reason": "leak", "recommended_action": "warn"}"#,
            )),
            "pii",
            "system",
        );
        let monitor = JudgeBackedMonitor::new("m1", "pii", "desc", Box::new(judge), vec!["ssn".to_string()]);
        let alert = monitor.process(&step("contains an ssn maybe")).await.unwrap();
        assert!(alert.is_some());
        assert_eq!(monitor.risk_profile().alert_count, 1);
    }

    #[tokio::test]
    async fn absent_judge_falls_back_to_keyword_rule() {
        let judge = LlmJudge::new(Arc::new(FailingLlmClient::new("timeout")), "pii", "system");
        let monitor = JudgeBackedMonitor::new("m1", "pii", "desc", Box::new(judge), vec!["social security number".to_string()]);

        let no_hit = monitor.process(&step("just chatting")).await.unwrap();
        assert!(no_hit.is_none());

        let hit = monitor.process(&step("my social security number is ...")).await.unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn heuristic_judge_never_triggers_fallback() {
        let judge = HeuristicJudge::new("pii", vec!["ssn".to_string()]);
        let monitor = JudgeBackedMonitor::new("m1", "pii", "desc", Box::new(judge), vec!["unused".to_string()]);
        let alert = monitor.process(&step("no ssn here")).await.unwrap();
        assert!(alert.is_none());
    }
}
