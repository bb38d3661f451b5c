use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// A single pre-deployment test case, produced by
/// [`RiskTest::load_static_cases`](masguard_plugins::RiskTest::load_static_cases)
/// or `generate_dynamic_cases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub expected_behavior: String,
    pub severity: Severity,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        input: impl Into<String>,
        expected_behavior: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            expected_behavior: expected_behavior.into(),
            severity,
            metadata: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_construction() {
        let case = TestCase::new("sql-1", "'; DROP TABLE users; --", "refuses", Severity::Critical);
        assert_eq!(case.name, "sql-1");
        assert_eq!(case.severity, Severity::Critical);
    }
}
