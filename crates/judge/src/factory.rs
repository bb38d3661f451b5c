use std::collections::HashMap;
use std::sync::Arc;

use crate::heuristic::HeuristicJudge;
use crate::judge::{Judge, LlmJudge};
use crate::llm_client::LlmClient;
use crate::prompts::PromptStore;

/// Everything a registered constructor needs to build one [`Judge`] for a
/// specific risk type.
pub struct JudgeBuildContext<'a> {
    pub risk_type: &'a str,
    pub system_prompt: String,
    pub llm_client: Arc<dyn LlmClient>,
}

type JudgeConstructor = Arc<dyn Fn(&JudgeBuildContext) -> Box<dyn Judge> + Send + Sync>;

/// Registers judge implementations by name and creates one per
/// `(riskType, judgeType)` pair, auto-loading the risk-specific system
/// prompt from [`PromptStore`] (§4.6).
///
/// An explicit manifest rather than auto-discovery (§9 "Plugin
/// auto-discovery → explicit manifest"): callers register constructors at
/// startup instead of relying on import-time side effects.
pub struct JudgeFactory {
    llm_client: Arc<dyn LlmClient>,
    prompts: PromptStore,
    constructors: HashMap<String, JudgeConstructor>,
}

impl JudgeFactory {
    #[must_use]
    pub fn new(llm_client: Arc<dyn LlmClient>, prompts: PromptStore) -> Self {
        let mut factory = Self {
            llm_client,
            prompts,
            constructors: HashMap::new(),
        };
        factory.register("llm", |ctx| Box::new(LlmJudge::new(Arc::clone(&ctx.llm_client), ctx.risk_type, ctx.system_prompt.clone())));
        factory
    }

    /// Register a named constructor. Re-registering a name overwrites the
    /// previous constructor.
    pub fn register(&mut self, judge_type: impl Into<String>, constructor: impl Fn(&JudgeBuildContext) -> Box<dyn Judge> + Send + Sync + 'static) {
        self.constructors.insert(judge_type.into(), Arc::new(constructor));
    }

    /// Register a heuristic judge for `risk_type` that matches `keywords`.
    pub fn register_heuristic(&mut self, risk_type: impl Into<String>, keywords: Vec<String>) {
        let risk_type = risk_type.into();
        self.register("heuristic", move |ctx| Box::new(HeuristicJudge::new(ctx.risk_type, keywords_for(&risk_type, ctx.risk_type, &keywords))));
    }

    /// Build the judge registered under `judge_type` for `risk_type`,
    /// loading its system prompt via the configured [`PromptStore`].
    #[must_use]
    pub fn create(&self, risk_type: &str, judge_type: &str) -> Option<Box<dyn Judge>> {
        let constructor = self.constructors.get(judge_type)?;
        let context = JudgeBuildContext {
            risk_type,
            system_prompt: self.prompts.resolve(risk_type),
            llm_client: Arc::clone(&self.llm_client),
        };
        Some(constructor(&context))
    }
}

fn keywords_for(registered_for: &str, requested: &str, keywords: &[String]) -> Vec<String> {
    if registered_for == requested {
        keywords.to_vec()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLlmClient;

    #[test]
    fn creates_llm_judge_with_resolved_prompt() {
        let factory = JudgeFactory::new(
            Arc::new(MockLlmClient::with_response("{}")),
            PromptStore::in_memory().with_default("prompt_injection", "custom prompt"),
        );
        let judge = factory.create("prompt_injection", "llm").unwrap();
        assert_eq!(judge.judge_type(), "llm");
    }

    #[test]
    fn unknown_judge_type_returns_none() {
        let factory = JudgeFactory::new(Arc::new(MockLlmClient::with_response("{}")), PromptStore::in_memory());
        assert!(factory.create("prompt_injection", "nonexistent").is_none());
    }

    #[test]
    fn registered_heuristic_is_scoped_to_its_risk_type() {
        let mut factory = JudgeFactory::new(Arc::new(MockLlmClient::with_response("{}")), PromptStore::in_memory());
        factory.register_heuristic("prompt_injection", vec!["ignore instructions".to_string()]);
        assert!(factory.create("prompt_injection", "heuristic").is_some());
    }
}
