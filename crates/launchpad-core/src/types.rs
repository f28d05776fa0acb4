use crate::error::LaunchpadError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// WizardStep
// ---------------------------------------------------------------------------

/// The three wizard steps. Serialized as their 1-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WizardStep {
    Source,
    Configure,
    Deploy,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[WizardStep::Source, WizardStep::Configure, WizardStep::Deploy]
    }

    pub fn number(self) -> u8 {
        match self {
            WizardStep::Source => 1,
            WizardStep::Configure => 2,
            WizardStep::Deploy => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<WizardStep> {
        match n {
            1 => Some(WizardStep::Source),
            2 => Some(WizardStep::Configure),
            3 => Some(WizardStep::Deploy),
            _ => None,
        }
    }

    /// The following step, saturating at `Deploy`.
    pub fn next(self) -> WizardStep {
        WizardStep::from_number(self.number() + 1).unwrap_or(WizardStep::Deploy)
    }

    /// The preceding step, saturating at `Source`.
    pub fn prev(self) -> WizardStep {
        WizardStep::from_number(self.number().saturating_sub(1)).unwrap_or(WizardStep::Source)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::Source => "source",
            WizardStep::Configure => "configure",
            WizardStep::Deploy => "deploy",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Source => "Import Git Repository",
            WizardStep::Configure => "Configure Project",
            WizardStep::Deploy => "Deploy",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> u8 {
        step.number()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = LaunchpadError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        WizardStep::from_number(n).ok_or_else(|| LaunchpadError::InvalidStep(n.to_string()))
    }
}

impl std::str::FromStr for WizardStep {
    type Err = LaunchpadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "source" => Ok(WizardStep::Source),
            "2" | "configure" => Ok(WizardStep::Configure),
            "3" | "deploy" => Ok(WizardStep::Deploy),
            _ => Err(LaunchpadError::InvalidStep(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Github,
    Public,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Github => "github",
            SourceType::Public => "public",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AutoDeploy
// ---------------------------------------------------------------------------

/// When the platform redeploys after project creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoDeploy {
    #[default]
    Commit,
    Pr,
    Disabled,
}

impl AutoDeploy {
    pub fn as_str(self) -> &'static str {
        match self {
            AutoDeploy::Commit => "commit",
            AutoDeploy::Pr => "pr",
            AutoDeploy::Disabled => "disabled",
        }
    }
}

impl fmt::Display for AutoDeploy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AutoDeploy {
    type Err = LaunchpadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit" => Ok(AutoDeploy::Commit),
            "pr" => Ok(AutoDeploy::Pr),
            "disabled" => Ok(AutoDeploy::Disabled),
            _ => Err(LaunchpadError::InvalidValue {
                field: "auto_deploy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// DeploymentStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    #[default]
    Idle,
    Building,
    Success,
    Failed,
}

impl DeploymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentStatus::Idle => "idle",
            DeploymentStatus::Building => "building",
            DeploymentStatus::Success => "success",
            DeploymentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DeploymentStatus::Success | DeploymentStatus::Failed)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RepoRef
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            default_branch: None,
        }
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoRef {
    type Err = LaunchpadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(RepoRef::new(owner, name.trim_end_matches(".git")))
            }
            _ => Err(LaunchpadError::InvalidValue {
                field: "repository".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_next_and_prev_saturate() {
        assert_eq!(WizardStep::Source.next(), WizardStep::Configure);
        assert_eq!(WizardStep::Configure.next(), WizardStep::Deploy);
        assert_eq!(WizardStep::Deploy.next(), WizardStep::Deploy);
        assert_eq!(WizardStep::Deploy.prev(), WizardStep::Configure);
        assert_eq!(WizardStep::Source.prev(), WizardStep::Source);
    }

    #[test]
    fn step_serializes_as_number() {
        let json = serde_json::to_string(&WizardStep::Configure).unwrap();
        assert_eq!(json, "2");
        let step: WizardStep = serde_json::from_str("3").unwrap();
        assert_eq!(step, WizardStep::Deploy);
        assert!(serde_json::from_str::<WizardStep>("4").is_err());
    }

    #[test]
    fn step_parses_number_or_name() {
        assert_eq!("1".parse::<WizardStep>().unwrap(), WizardStep::Source);
        assert_eq!("deploy".parse::<WizardStep>().unwrap(), WizardStep::Deploy);
        assert!(matches!(
            "0".parse::<WizardStep>(),
            Err(LaunchpadError::InvalidStep(_))
        ));
    }

    #[test]
    fn repo_ref_parses_owner_and_name() {
        let repo: RepoRef = "acme/web.git".parse().unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "web");
        assert_eq!(repo.full_name(), "acme/web");
        assert!("acme".parse::<RepoRef>().is_err());
        assert!("a/b/c".parse::<RepoRef>().is_err());
    }

    #[test]
    fn auto_deploy_roundtrips_through_str() {
        for mode in [AutoDeploy::Commit, AutoDeploy::Pr, AutoDeploy::Disabled] {
            assert_eq!(mode.as_str().parse::<AutoDeploy>().unwrap(), mode);
        }
        assert!("sometimes".parse::<AutoDeploy>().is_err());
    }
}
