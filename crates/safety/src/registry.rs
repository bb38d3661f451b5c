use std::sync::Arc;

use masguard_plugins::{Monitor, RiskTest};

/// A named constructor for one monitor plugin. Takes no arguments — any
/// configuration a concrete monitor needs is closed over when the
/// constructor is registered.
pub type MonitorConstructor = Arc<dyn Fn() -> Result<Box<dyn Monitor>, String> + Send + Sync>;

/// A named constructor for one risk test plugin.
pub type RiskTestConstructor = Arc<dyn Fn() -> Result<Box<dyn RiskTest>, String> + Send + Sync>;
