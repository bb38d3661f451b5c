use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Resolves the system prompt for a given risk type (§4.6).
///
/// Looks for `<directory>/<risk_name>.txt` on disk first; if the file is
/// missing, falls back to a generic template (registered ones take
/// priority, otherwise a built-in default), logging a warning either way so
/// a missing prompt file is visible in ops without failing the analysis.
pub struct PromptStore {
    directory: Option<PathBuf>,
    defaults: HashMap<String, String>,
}

impl PromptStore {
    /// A store with no on-disk directory: every risk type uses the generic
    /// default (or a registered override).
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            directory: None,
            defaults: HashMap::new(),
        }
    }

    /// A store that looks for `<directory>/<risk_name>.txt` before falling
    /// back to defaults.
    #[must_use]
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            defaults: HashMap::new(),
        }
    }

    /// Register a fallback template for a specific risk type, used when no
    /// prompt file exists for it.
    #[must_use]
    pub fn with_default(mut self, risk_name: impl Into<String>, template: impl Into<String>) -> Self {
        self.defaults.insert(risk_name.into(), template.into());
        self
    }

    /// Resolve the system prompt for `risk_name`.
    #[must_use]
    pub fn resolve(&self, risk_name: &str) -> String {
        if let Some(dir) = &self.directory {
            let path = prompt_path(dir, risk_name);
            match std::fs::read_to_string(&path) {
                Ok(contents) => return contents,
                Err(err) => warn!(risk = %risk_name, path = %path.display(), error = %err, "risk-specific prompt file missing, using fallback"),
            }
        }

        self.defaults
            .get(risk_name)
            .cloned()
            .unwrap_or_else(|| generic_template(risk_name))
    }
}

fn prompt_path(directory: &Path, risk_name: &str) -> PathBuf {
    directory.join(format!("{risk_name}.txt"))
}

fn generic_template(risk_name: &str) -> String {
    format!(
        "You are a safety analyst reviewing content for \"{risk_name}\" risk. \
         Respond with a strict JSON object: \
         {{\"has_risk\": bool, \"severity\": \"none\"|\"info\"|\"warning\"|\"critical\", \
         \"reason\": string, \"evidence\": [string], \"recommended_action\": \"log\"|\"warn\"|\"block\"}}."
    )
}
