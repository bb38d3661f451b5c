pub mod builder;
pub mod config;
pub mod error;
pub mod intermediary;
pub mod monitoring;
pub mod registry;
pub mod report;
pub mod safety;

pub use builder::SafetyBuilder;
pub use config::SafetyConfig;
pub use error::SafetyError;
pub use intermediary::Intermediary;
pub use monitoring::MonitoringMode;
pub use registry::{MonitorConstructor, RiskTestConstructor};
pub use report::{MonitoringReport, ReportSummary, SafetyReport};
pub use safety::{MonitorEvaluations, MonitoredTestResult, Outcome, Safety};
