use crate::error::{LaunchpadError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_DOMAIN: &str = "launchpad.app";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DeployConfig
// ---------------------------------------------------------------------------

/// Timing and naming for the simulated deploy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_base_domain")]
    pub base_domain: String,
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_completion_delay")]
    pub completion_delay_ms: u64,
}

fn default_base_domain() -> String {
    DEFAULT_BASE_DOMAIN.to_string()
}

fn default_min_delay() -> u64 {
    300
}

fn default_max_delay() -> u64 {
    800
}

fn default_completion_delay() -> u64 {
    1000
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            base_domain: default_base_domain(),
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
            completion_delay_ms: default_completion_delay(),
        }
    }
}

impl DeployConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub deploy: DeployConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            deploy: DeployConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(LaunchpadError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(LaunchpadError::NotInitialized) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let deploy = &self.deploy;

        if deploy.min_delay_ms > deploy.max_delay_ms {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "deploy.min_delay_ms ({}) is greater than deploy.max_delay_ms ({})",
                    deploy.min_delay_ms, deploy.max_delay_ms
                ),
            });
        }

        if deploy.max_delay_ms > 10_000 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "deploy.max_delay_ms={} (>10s per log line is unusual)",
                    deploy.max_delay_ms
                ),
            });
        }

        let domain = deploy.base_domain.trim();
        if domain.is_empty() || domain.contains('/') || domain.contains(char::is_whitespace) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("deploy.base_domain '{}' is not a hostname", deploy.base_domain),
            });
        }

        warnings
    }

    /// Fail on the first error-level warning.
    pub fn ensure_valid(&self) -> Result<()> {
        match self
            .validate()
            .into_iter()
            .find(|w| w.level == WarnLevel::Error)
        {
            Some(w) => Err(LaunchpadError::InvalidConfig(w.message)),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_validate_clean() {
        let cfg = Config::default();
        assert!(cfg.validate().is_empty());
        assert!(cfg.ensure_valid().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("deploy:\n  base_domain: example.dev\n").unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.deploy.base_domain, "example.dev");
        assert_eq!(cfg.deploy.min_delay_ms, 300);
        assert_eq!(cfg.deploy.completion_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn inverted_delays_are_an_error() {
        let mut cfg = Config::default();
        cfg.deploy.min_delay_ms = 900;
        cfg.deploy.max_delay_ms = 100;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(matches!(
            cfg.ensure_valid(),
            Err(LaunchpadError::InvalidConfig(_))
        ));
    }

    #[test]
    fn long_delay_is_only_a_warning() {
        let mut cfg = Config::default();
        cfg.deploy.max_delay_ms = 20_000;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert!(cfg.ensure_valid().is_ok());
    }

    #[test]
    fn bad_base_domain() {
        let mut cfg = Config::default();
        cfg.deploy.base_domain = "https://x.dev/".into();
        assert!(cfg.ensure_valid().is_err());
    }

    #[test]
    fn load_missing_is_not_initialized_but_default_works() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(LaunchpadError::NotInitialized)
        ));
        let cfg = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.deploy, DeployConfig::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::load_or_default(dir.path()).unwrap();
        cfg.deploy.base_domain = "apps.internal".into();
        cfg.save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), cfg);
    }
}
