pub mod config;
pub mod deploy;
pub mod details;
pub mod env;
pub mod finish;
pub mod init;
pub mod source;
pub mod status;
pub mod step;

use anyhow::Context;
use deploy_runner::WizardController;
use launchpad_core::{config::Config, draft};
use std::path::Path;

/// Load the config and the saved draft into a live controller.
pub(crate) fn open(root: &Path) -> anyhow::Result<(Config, WizardController)> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    config.ensure_valid()?;
    let state = draft::load(root).context("failed to load wizard")?;
    let wizard = WizardController::with_state(state, &config.deploy)?;
    Ok((config, wizard))
}

pub(crate) fn save(root: &Path, wizard: &WizardController) -> anyhow::Result<()> {
    draft::save(root, &wizard.snapshot()).context("failed to save wizard")
}
