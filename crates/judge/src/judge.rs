use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use masguard_core::{JudgeResult, JudgeSeverity, RecommendedAction};
use serde::Deserialize;
use tracing::warn;

use crate::llm_client::LlmClient;

/// `Judge.analyze(content, context?) -> JudgeResult?` (§4.6, C8).
///
/// Implementations must return `None` — never `Some(JudgeResult { has_risk:
/// false, .. })` — when they could not reach a decision; see the tri-state
/// design note on [`JudgeResult`].
#[async_trait]
pub trait Judge: Send + Sync {
    async fn analyze(&self, content: &str, context: Option<&HashMap<String, String>>) -> Option<JudgeResult>;

    /// The name this judge reports as `JudgeResult::judge_type`.
    fn judge_type(&self) -> &str;
}

/// Raw shape an LLM is instructed to respond with.
#[derive(Debug, Deserialize)]
struct RawJudgeResponse {
    has_risk: bool,
    severity: String,
    reason: String,
    #[serde(default)]
    evidence: Vec<String>,
    recommended_action: String,
}

/// A [`Judge`] backed by an external LLM (§4.6).
pub struct LlmJudge {
    client: Arc<dyn LlmClient>,
    risk_type: String,
    system_prompt: String,
}

impl LlmJudge {
    #[must_use]
    pub fn new(client: Arc<dyn LlmClient>, risk_type: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            risk_type: risk_type.into(),
            system_prompt: system_prompt.into(),
        }
    }

    fn build_user_prompt(&self, content: &str, context: Option<&HashMap<String, String>>) -> String {
        let mut prompt = format!("Analyze this content for {} risks: {content}", self.risk_type);
        if let Some(context) = context {
            if !context.is_empty() {
                prompt.push_str("\n\nContext: ");
                let mut entries: Vec<String> = context.iter().map(|(k, v)| format!("{k}={v}")).collect();
                entries.sort();
                prompt.push_str(&entries.join(", "));
            }
        }
        prompt
    }

    /// Strip ``` fences, parse strict JSON, validate enum fields, and
    /// substitute out-of-range `severity`/`recommended_action` values with
    /// `none`/`log` while warning (§4.6).
    fn parse_response(&self, raw: &str) -> Option<JudgeResult> {
        let trimmed = strip_code_fences(raw);

        let parsed: RawJudgeResponse = match serde_json::from_str(&trimmed) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(risk = %self.risk_type, error = %err, "judge response failed to parse as JSON");
                return None;
            }
        };

        let severity = match parsed.severity.as_str() {
            "none" => JudgeSeverity::None,
            "info" => JudgeSeverity::Info,
            "warning" => JudgeSeverity::Warning,
            "critical" => JudgeSeverity::Critical,
            other => {
                warn!(risk = %self.risk_type, value = other, "judge returned unrecognized severity, defaulting to none");
                JudgeSeverity::None
            }
        };

        let recommended_action = match parsed.recommended_action.as_str() {
            "log" => RecommendedAction::Log,
            "warn" => RecommendedAction::Warn,
            "block" => RecommendedAction::Block,
            other => {
                warn!(risk = %self.risk_type, value = other, "judge returned unrecognized recommended_action, defaulting to log");
                RecommendedAction::Log
            }
        };

        Some(
            JudgeResult::new(parsed.has_risk, severity, parsed.reason, recommended_action, self.judge_type())
                .with_evidence(parsed.evidence)
                .with_raw_response(raw),
        )
    }
}

#[async_trait]
impl Judge for LlmJudge {
    async fn analyze(&self, content: &str, context: Option<&HashMap<String, String>>) -> Option<JudgeResult> {
        let user = self.build_user_prompt(content, context);
        match self.client.generate_with_system(&self.system_prompt, &user, None, None).await {
            Ok(raw) => self.parse_response(&raw),
            Err(err) => {
                warn!(risk = %self.risk_type, error = %err, "LLM client error, judge returning absent");
                None
            }
        }
    }

    fn judge_type(&self) -> &str {
        "llm"
    }
}

fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let without_opening = trimmed.strip_prefix("```json").or_else(|| trimmed.strip_prefix("```")).unwrap_or(trimmed);
    without_opening.strip_suffix("```").unwrap_or(without_opening).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FailingLlmClient, MockLlmClient};

    fn judge(response: &str) -> LlmJudge {
        LlmJudge::new(Arc::new(MockLlmClient::with_response(response)), "prompt_injection", "system prompt")
    }

    #[tokio::test]
    async fn parses_plain_json() {
        let j = judge(r#"{"has_risk": true, "severity": "warning", "reason": "found it", "evidence": ["a"], "recommended_action": "warn"}"#);
        let result = j.analyze("content", None).await.unwrap();
        assert!(result.has_risk);
        assert_eq!(result.severity, JudgeSeverity::Warning);
        assert_eq!(result.evidence, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn strips_markdown_fences() {
        let j = judge("```json\n{\"has_risk\": false, \"severity\": \"none\", \"reason\": \"clean\", \"recommended_action\": \"log\"}\n```");
        let result = j.analyze("content", None).await.unwrap();
        assert!(!result.has_risk);
    }

    #[tokio::test]
    async fn invalid_enum_values_fall_back_with_warning() {
        let j = judge(r#"{"has_risk": true, "severity": "catastrophic", "reason": "x", "recommended_action": "nuke"}"#);
        let result = j.analyze("content", None).await.unwrap();
        assert_eq!(result.severity, JudgeSeverity::None);
        assert_eq!(result.recommended_action, RecommendedAction::Log);
    }

    #[tokio::test]
    async fn malformed_json_returns_absent() {
        let j = judge("not json at all");
        assert!(j.analyze("content", None).await.is_none());
    }

    #[tokio::test]
    async fn client_error_returns_absent() {
        let j = LlmJudge::new(Arc::new(FailingLlmClient::new("timeout")), "prompt_injection", "system prompt");
        assert!(j.analyze("content", None).await.is_none());
    }
}
