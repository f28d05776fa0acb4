use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use launchpad_core::branches::{pick_branch, BranchSource};
use launchpad_core::config::DeployConfig;
use launchpad_core::env::EnvVar;
use launchpad_core::project::deployed_url;
use launchpad_core::types::{DeploymentStatus, RepoRef, SourceType, WizardStep};
use launchpad_core::validate::{validate_current_step, Validation};
use launchpad_core::wizard::{DeploymentUpdate, ProjectDetailsUpdate, SourceCodeUpdate};
use launchpad_core::{LaunchpadError, Result, WizardState};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::event::DeployEvent;
use crate::runner::{drive, DelayPolicy, RunPlan};
use crate::script;
use crate::store::Store;

/// Error recorded on a deployment that was `building` when its wizard was
/// saved and has no run behind it any more.
pub const INTERRUPTED: &str = "deployment was interrupted before it finished";

// ─── WizardController ─────────────────────────────────────────────────────

struct Shared {
    store: Arc<Store>,
    task: Mutex<Option<JoinHandle<()>>>,
    policy: DelayPolicy,
    base_domain: String,
}

impl Shared {
    fn abort_task(&self) {
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Keep `task` as the active run. A handle stored by a concurrent start
    /// is aborted rather than dropped.
    fn install(&self, task: JoinHandle<()>) {
        let previous = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn has_live_task(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the timer chain, if any, and stop it from writing even if it is
    /// already past its last await point.
    fn cancel_run(&self) {
        self.abort_task();
        self.store.invalidate();
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(handle) = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

/// Handle to one wizard: its state, navigation, editing, and the simulated
/// deploy run. Clones share the same wizard. Dropping the last clone aborts
/// any run in flight.
#[derive(Clone)]
pub struct WizardController {
    shared: Arc<Shared>,
}

impl WizardController {
    pub fn new(config: &DeployConfig) -> Result<Self> {
        Self::with_state(WizardState::new(), config)
    }

    /// Resume from a saved wizard. A run that was `building` when saved has
    /// no timer chain any more, so it comes back as `failed` and can be
    /// retried.
    pub fn with_state(state: WizardState, config: &DeployConfig) -> Result<Self> {
        let policy = DelayPolicy::from_config(config)?;
        Ok(Self::with_policy(state, policy, &config.base_domain))
    }

    pub fn with_policy(mut state: WizardState, policy: DelayPolicy, base_domain: &str) -> Self {
        if state.deployment.status == DeploymentStatus::Building {
            warn!("resumed deployment was still building; marking it interrupted");
            state.deployment.fail(INTERRUPTED, Utc::now());
        }
        Self {
            shared: Arc::new(Shared {
                store: Arc::new(Store::new(state)),
                task: Mutex::new(None),
                policy,
                base_domain: base_domain.to_string(),
            }),
        }
    }

    fn store(&self) -> &Store {
        &self.shared.store
    }

    // ─── Reads ────────────────────────────────────────────────────────────

    /// A copy of the whole wizard as of now.
    pub fn snapshot(&self) -> WizardState {
        self.store().read(WizardState::clone)
    }

    pub fn current_step(&self) -> WizardStep {
        self.store().read(|w| w.current_step)
    }

    pub fn deployment_status(&self) -> DeploymentStatus {
        self.store().read(|w| w.deployment.status)
    }

    pub fn logs(&self) -> Vec<String> {
        self.store().read(|w| w.deployment.logs.clone())
    }

    pub fn can_go_to_next_step(&self) -> bool {
        self.store().read(WizardState::can_go_to_next_step)
    }

    pub fn can_go_to_prev_step(&self) -> bool {
        self.store().read(WizardState::can_go_to_prev_step)
    }

    pub fn validate_current_step(&self) -> Validation {
        self.store().read(validate_current_step)
    }

    pub fn export_to_env(&self) -> String {
        self.store().read(WizardState::export_to_env)
    }

    // ─── Navigation ───────────────────────────────────────────────────────

    pub fn go_to_next_step(&self) {
        self.store().write(WizardState::go_to_next_step);
    }

    pub fn go_to_prev_step(&self) {
        self.store().write(WizardState::go_to_prev_step);
    }

    pub fn go_to_step(&self, step: WizardStep) {
        self.store().write(|w| w.go_to_step(step));
    }

    // ─── Data store ───────────────────────────────────────────────────────

    pub fn update_source_code(&self, update: SourceCodeUpdate) {
        self.store().write(|w| w.update_source_code(update));
    }

    pub fn update_project_details(&self, update: ProjectDetailsUpdate) {
        self.store().write(|w| w.update_project_details(update));
    }

    /// Raw merge into the deployment sub-record. Setting any status other
    /// than `building` detaches the active run so it cannot overwrite it.
    pub fn update_deployment(&self, update: DeploymentUpdate) {
        if matches!(update.status, Some(s) if s != DeploymentStatus::Building) {
            self.shared.cancel_run();
        }
        self.store().write(|w| w.update_deployment(update));
    }

    pub fn reset_wizard(&self) {
        self.shared.cancel_run();
        self.store().write(WizardState::reset);
        info!("wizard reset");
    }

    /// Select a public repository by URL.
    pub fn select_public_repo(&self, url: impl Into<String>) {
        self.update_source_code(SourceCodeUpdate {
            source_type: Some(Some(SourceType::Public)),
            github_repo: Some(None),
            public_repo_url: Some(Some(url.into())),
        });
    }

    /// Select a GitHub repository, fetch its branches, and move the branch
    /// selection onto one the repository actually has. Returns the branches.
    pub fn select_github_repo(
        &self,
        repo: RepoRef,
        branches: &dyn BranchSource,
    ) -> Result<Vec<String>> {
        let available = branches.fetch_branches(&repo)?;
        self.store().write(|w| {
            let branch = pick_branch(&w.project_details.branch, &repo, &available);
            w.update_source_code(SourceCodeUpdate {
                source_type: Some(Some(SourceType::Github)),
                github_repo: Some(Some(repo)),
                public_repo_url: Some(None),
            });
            w.update_project_details(ProjectDetailsUpdate {
                branch: Some(branch),
                ..Default::default()
            });
        });
        Ok(available)
    }

    pub fn clear_source(&self) {
        self.update_source_code(SourceCodeUpdate {
            source_type: Some(None),
            github_repo: Some(None),
            public_repo_url: Some(None),
        });
    }

    // ─── Environment variables ────────────────────────────────────────────

    pub fn env_vars(&self) -> Vec<EnvVar> {
        self.store().read(|w| w.env_vars().to_vec())
    }

    pub fn add_environment_variable(&self) {
        self.store().write(WizardState::add_environment_variable);
    }

    pub fn update_environment_variable(&self, index: usize, key: &str, value: &str) {
        self.store()
            .write(|w| w.update_environment_variable(index, key, value));
    }

    pub fn remove_environment_variable(&self, index: usize) {
        self.store().write(|w| w.remove_environment_variable(index));
    }

    pub fn import_from_env(&self, content: &str) {
        self.store().write(|w| w.import_from_env(content));
    }

    // ─── Deployment ───────────────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<DeployEvent> {
        self.store().subscribe()
    }

    /// Start a simulated deploy run, superseding any run in flight.
    ///
    /// The deployment is `building` with empty logs when this returns.
    /// Must be called from inside a Tokio runtime. Returns the run number
    /// carried by its [`DeployEvent`]s.
    pub fn start_deployment(&self) -> Result<u64> {
        let handle = Handle::try_current()
            .map_err(|_| LaunchpadError::NotReady("no async runtime to run the deploy".into()))?;

        let (step, name) = self
            .store()
            .read(|w| (w.current_step, w.project_details.project_name.clone()));
        if step != WizardStep::Deploy {
            return Err(LaunchpadError::NotReady(format!(
                "wizard is on step {} ({step}); deploy runs on step 3",
                step.number()
            )));
        }
        if name.is_empty() {
            return Err(LaunchpadError::NotReady("project name is empty".into()));
        }

        self.shared.cancel_run();

        let run = self.store().begin_run();
        let lines = self
            .store()
            .read(|w| script::lines(w, &self.shared.base_domain));
        let plan = RunPlan {
            run,
            lines,
            deployed_url: deployed_url(&name, &self.shared.base_domain),
            policy: self.shared.policy,
        };

        self.shared
            .install(handle.spawn(drive(self.shared.store.clone(), plan)));
        Ok(run)
    }

    /// Re-run a failed deployment.
    pub fn retry_deployment(&self) -> Result<u64> {
        let status = self.deployment_status();
        if status != DeploymentStatus::Failed {
            return Err(LaunchpadError::InvalidTransition {
                from: status.to_string(),
                to: DeploymentStatus::Building.to_string(),
                reason: "only a failed deployment can be retried".into(),
            });
        }
        info!("retrying failed deployment");
        self.start_deployment()
    }

    /// Record a failure detected outside the runner. Stops the active run.
    pub fn mark_failed(&self, error: impl Into<String>) {
        let error = error.into();
        warn!(error = %error, "deployment marked failed");
        self.shared.abort_task();
        self.store().fail(error);
    }

    /// Wait until the deployment is no longer `building`. Returns the
    /// current status at once when no run is in flight.
    pub async fn wait(&self) -> DeploymentStatus {
        let mut rx = self.store().watch_status();
        if !self.shared.has_live_task() {
            return self.deployment_status();
        }
        let result = rx
            .wait_for(|s| *s != DeploymentStatus::Building)
            .await
            .map(|s| *s);
        match result {
            Ok(status) => status,
            Err(_) => self.deployment_status(),
        }
    }
}
