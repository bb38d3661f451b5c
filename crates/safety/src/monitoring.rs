/// How `Safety::start_monitoring` selects which monitors become active
/// (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitoringMode {
    /// Activate exactly the monitors named in `selected` (possibly none).
    Manual,
    /// Activate every registered monitor.
    All,
}
