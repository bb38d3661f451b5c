pub mod alert;
pub mod error;
pub mod judge_result;
pub mod message;
pub mod message_log;
pub mod risk_profile;
pub mod severity;
pub mod step;
pub mod test_case;
pub mod test_result;
pub mod trace;
pub mod types;

pub use alert::Alert;
pub use error::CoreError;
pub use judge_result::JudgeResult;
pub use message::Message;
pub use message_log::MessageLog;
pub use risk_profile::{KnownVulnerability, RiskProfile, compute_risk_level, derive_recommendations};
pub use severity::{AlertSeverity, JudgeSeverity, RecommendedAction, RiskLevel, Severity};
pub use step::{AgentStepLog, StepType};
pub use test_case::TestCase;
pub use test_result::{CaseResult, SeveritySummary, TestResult};
pub use trace::WorkflowTrace;
pub use types::{AgentName, MonitorName, RiskName};
