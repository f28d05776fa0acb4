use crate::env::EnvVar;
use crate::types::{AutoDeploy, DeploymentStatus, RepoRef, SourceType, WizardStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_BUILD_COMMAND: &str = "npm run build";

// ---------------------------------------------------------------------------
// Sub-records
// ---------------------------------------------------------------------------

/// Where the project's code comes from. `source_type` selects which of the
/// two optional fields is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCode {
    #[serde(rename = "type")]
    pub source_type: Option<SourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<RepoRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_repo_url: Option<String>,
}

impl SourceCode {
    /// Human-readable description of the selected source, if complete.
    pub fn describe(&self) -> Option<String> {
        match self.source_type? {
            SourceType::Github => self.github_repo.as_ref().map(RepoRef::full_name),
            SourceType::Public => self.public_repo_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub project_name: String,
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,
    pub build_command: String,
    #[serde(default)]
    pub environment_variables: Vec<EnvVar>,
    #[serde(default)]
    pub auto_deploy: AutoDeploy,
}

impl Default for ProjectDetails {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            branch: DEFAULT_BRANCH.to_string(),
            root_directory: None,
            build_command: DEFAULT_BUILD_COMMAND.to_string(),
            environment_variables: Vec::new(),
            auto_deploy: AutoDeploy::Commit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub status: DeploymentStatus,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Deployment {
    /// Enter `building` for a fresh run: logs and results of any previous
    /// run are dropped before the first line can be appended.
    pub fn begin(&mut self, now: DateTime<Utc>) {
        self.status = DeploymentStatus::Building;
        self.logs.clear();
        self.deployed_url = None;
        self.error = None;
        self.start_time = Some(now);
        self.end_time = None;
    }

    pub fn append_log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }

    pub fn succeed(&mut self, deployed_url: String, now: DateTime<Utc>) {
        self.status = DeploymentStatus::Success;
        self.deployed_url = Some(deployed_url);
        self.end_time = Some(now);
    }

    pub fn fail(&mut self, error: impl Into<String>, now: DateTime<Utc>) {
        self.status = DeploymentStatus::Failed;
        self.error = Some(error.into());
        self.end_time = Some(now);
    }

    /// Wall-clock duration of the run, once it has ended.
    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.end_time? - self.start_time?)
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------
//
// Each field left as `None` is untouched by the merge. Optional target fields
// take `Some(None)` to clear them.

#[derive(Debug, Clone, Default)]
pub struct SourceCodeUpdate {
    pub source_type: Option<Option<SourceType>>,
    pub github_repo: Option<Option<RepoRef>>,
    pub public_repo_url: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectDetailsUpdate {
    pub project_name: Option<String>,
    pub branch: Option<String>,
    pub root_directory: Option<Option<String>>,
    pub build_command: Option<String>,
    /// Replaces the whole sequence; there is no per-element patch.
    pub environment_variables: Option<Vec<EnvVar>>,
    pub auto_deploy: Option<AutoDeploy>,
}

#[derive(Debug, Clone, Default)]
pub struct DeploymentUpdate {
    pub status: Option<DeploymentStatus>,
    pub logs: Option<Vec<String>>,
    pub deployed_url: Option<Option<String>>,
    pub error: Option<Option<String>>,
    pub start_time: Option<Option<DateTime<Utc>>>,
    pub end_time: Option<Option<DateTime<Utc>>>,
}

fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

// ---------------------------------------------------------------------------
// WizardState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step: WizardStep,
    #[serde(default)]
    pub source_code: SourceCode,
    #[serde(default)]
    pub project_details: ProjectDetails,
    #[serde(default)]
    pub deployment: Deployment,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: WizardStep::Source,
            source_code: SourceCode::default(),
            project_details: ProjectDetails::default(),
            deployment: Deployment::default(),
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn go_to_next_step(&mut self) {
        self.current_step = self.current_step.next();
    }

    pub fn go_to_prev_step(&mut self) {
        self.current_step = self.current_step.prev();
    }

    /// Jump straight to `step`. Business rules are the caller's concern.
    pub fn go_to_step(&mut self, step: WizardStep) {
        self.current_step = step;
    }

    pub fn can_go_to_next_step(&self) -> bool {
        match self.current_step {
            WizardStep::Source => {
                let src = &self.source_code;
                match src.source_type {
                    None => false,
                    Some(SourceType::Public) => src
                        .public_repo_url
                        .as_deref()
                        .is_some_and(|u| !u.is_empty()),
                    Some(SourceType::Github) => src.github_repo.is_some(),
                }
            }
            WizardStep::Configure => {
                !self.project_details.project_name.is_empty()
                    && !self.project_details.branch.is_empty()
            }
            WizardStep::Deploy => false,
        }
    }

    pub fn can_go_to_prev_step(&self) -> bool {
        self.current_step > WizardStep::Source
    }

    // -----------------------------------------------------------------------
    // Data store
    // -----------------------------------------------------------------------

    pub fn update_source_code(&mut self, update: SourceCodeUpdate) {
        let src = &mut self.source_code;
        merge(&mut src.source_type, update.source_type);
        merge(&mut src.github_repo, update.github_repo);
        merge(&mut src.public_repo_url, update.public_repo_url);
    }

    pub fn update_project_details(&mut self, update: ProjectDetailsUpdate) {
        let details = &mut self.project_details;
        merge(&mut details.project_name, update.project_name);
        merge(&mut details.branch, update.branch);
        merge(&mut details.root_directory, update.root_directory);
        merge(&mut details.build_command, update.build_command);
        merge(
            &mut details.environment_variables,
            update.environment_variables,
        );
        merge(&mut details.auto_deploy, update.auto_deploy);
    }

    pub fn update_deployment(&mut self, update: DeploymentUpdate) {
        let dep = &mut self.deployment;
        merge(&mut dep.status, update.status);
        merge(&mut dep.logs, update.logs);
        merge(&mut dep.deployed_url, update.deployed_url);
        merge(&mut dep.error, update.error);
        merge(&mut dep.start_time, update.start_time);
        merge(&mut dep.end_time, update.end_time);
    }

    pub fn reset(&mut self) {
        *self = WizardState::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
