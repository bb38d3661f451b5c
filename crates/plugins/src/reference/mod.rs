mod judge_monitor;

pub use judge_monitor::JudgeBackedMonitor;
pub use probe_test::DirectProbeTest;
