use std::collections::HashMap;

use async_trait::async_trait;
use masguard_core::{JudgeResult, JudgeSeverity, RecommendedAction};

use crate::judge::Judge;

/// A keyword/pattern-matching [`Judge`] (§4.6). Always returns present —
/// it has no external dependency that can fail, so there is nothing for it
/// to be absent about.
pub struct HeuristicJudge {
    risk_type: String,
    keywords: Vec<String>,
}

impl HeuristicJudge {
    #[must_use]
    pub fn new(risk_type: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            risk_type: risk_type.into(),
            keywords,
        }
    }

    fn matches(&self, content: &str) -> Vec<String> {
        let lower = content.to_lowercase();
        self.keywords.iter().filter(|k| lower.contains(k.to_lowercase().as_str())).cloned().collect()
    }
}

#[async_trait]
impl Judge for HeuristicJudge {
    async fn analyze(&self, content: &str, _context: Option<&HashMap<String, String>>) -> Option<JudgeResult> {
        let hits = self.matches(content);
        if hits.is_empty() {
            return Some(JudgeResult::new(
                false,
                JudgeSeverity::None,
                format!("no {} keywords matched", self.risk_type),
                RecommendedAction::Log,
                self.judge_type(),
            ));
        }

        Some(
            JudgeResult::new(
                true,
                JudgeSeverity::Warning,
                format!("matched {} keyword(s) for {}", hits.len(), self.risk_type),
                RecommendedAction::Warn,
                self.judge_type(),
            )
            .with_evidence(hits),
        )
    }

    fn judge_type(&self) -> &str {
        "heuristic"
    }
}
