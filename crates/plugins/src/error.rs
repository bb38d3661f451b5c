use thiserror::Error;

/// Errors a plugin can raise back to its caller (§7 `MonitorFailure` /
/// `TestCaseFailure`). Both are caught and isolated one level up: the
/// coordinator logs and skips a failing monitor; `RiskTest::run` records a
/// failing case and continues the batch.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("monitor failed: {0}")]
    Monitor(String),

    #[error("test case failed: {0}")]
    TestCase(String),

    #[error(transparent)]
    Adapter(#[from] masguard_adapter::AdapterError),
}
