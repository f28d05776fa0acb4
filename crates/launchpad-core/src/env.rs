use crate::wizard::WizardState;
use serde::{Deserialize, Serialize};

/// One environment variable row. Keys are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parse `.env`-style text into ordered key/value pairs.
///
/// Blank lines and `#` comments are skipped. Each remaining line is split on
/// its first `=`; both halves are trimmed and any later `=` stays in the
/// value. Entries whose key ends up empty are dropped.
pub fn parse_env(content: &str) -> Vec<EnvVar> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| match l.split_once('=') {
            Some((k, v)) => EnvVar::new(k.trim(), v.trim()),
            None => EnvVar::new(l, ""),
        })
        .filter(|v| !v.key.is_empty())
        .collect()
}

/// Render pairs back to `KEY=VALUE` lines. Rows without a key are skipped.
pub fn render_env(vars: &[EnvVar]) -> String {
    let mut out = String::new();
    for var in vars.iter().filter(|v| !v.key.is_empty()) {
        out.push_str(&var.key);
        out.push('=');
        out.push_str(&var.value);
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Editor operations
// ---------------------------------------------------------------------------

impl WizardState {
    pub fn env_vars(&self) -> &[EnvVar] {
        &self.project_details.environment_variables
    }

    pub fn add_environment_variable(&mut self) {
        self.project_details
            .environment_variables
            .push(EnvVar::default());
    }

    /// Out-of-range indices are ignored.
    pub fn update_environment_variable(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        if let Some(slot) = self.project_details.environment_variables.get_mut(index) {
            *slot = EnvVar::new(key, value);
        }
    }

    /// Out-of-range indices are ignored.
    pub fn remove_environment_variable(&mut self, index: usize) {
        let vars = &mut self.project_details.environment_variables;
        if index < vars.len() {
            vars.remove(index);
        }
    }

    /// Replace every variable with the pairs parsed from `content`.
    pub fn import_from_env(&mut self, content: &str) {
        self.project_details.environment_variables = parse_env(content);
    }

    pub fn export_to_env(&self) -> String {
        render_env(&self.project_details.environment_variables)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
