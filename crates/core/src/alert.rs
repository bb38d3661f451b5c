use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::{AlertSeverity, RecommendedAction};

/// A finding emitted by a [`Monitor`](masguard_plugins::Monitor) while
/// processing the live event stream.
///
/// Owned by its emitting monitor until [`Safety::record_alert`]
/// (`masguard_safety`) hands a copy to the coordinator's session-level list
/// (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub risk_type: String,
    pub message: String,
    #[serde(default)]
    pub evidence: HashMap<String, serde_json::Value>,
    pub recommended_action: RecommendedAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn new(
        severity: AlertSeverity,
        risk_type: impl Into<String>,
        message: impl Into<String>,
        recommended_action: RecommendedAction,
    ) -> Self {
        Self {
            severity,
            risk_type: risk_type.into(),
            message: message.into(),
            evidence: HashMap::new(),
            recommended_action,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn with_evidence(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }

    /// Stamp this alert with the current time, as the coordinator does when
    /// draining a monitor's finding into the session list (§4.8).
    #[must_use]
    pub fn stamped(mut self) -> Self {
        self.timestamp = Some(Utc::now());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamping_sets_timestamp_once() {
        let alert = Alert::new(AlertSeverity::Warning, "pii-leak", "found an email", RecommendedAction::Warn)
            .with_evidence("match", "user@example.com")
            .stamped();
        assert!(alert.timestamp.is_some());
        assert_eq!(alert.evidence.len(), 1);
    }
}
