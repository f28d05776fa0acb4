//! Saved copy of an unfinished wizard, kept by the CLI between invocations.

use crate::error::{LaunchpadError, Result};
use crate::paths;
use crate::wizard::WizardState;
use std::path::Path;

/// Load the saved draft, or a fresh wizard when none exists.
pub fn load(root: &Path) -> Result<WizardState> {
    if !paths::launchpad_dir(root).is_dir() {
        return Err(LaunchpadError::NotInitialized);
    }
    let path = paths::wizard_path(root);
    if !path.exists() {
        return Ok(WizardState::new());
    }
    let data = std::fs::read_to_string(&path)?;
    Ok(serde_yaml::from_str(&data)?)
}

pub fn save(root: &Path, state: &WizardState) -> Result<()> {
    let data = serde_yaml::to_string(state)?;
    crate::io::atomic_write(&paths::wizard_path(root), data.as_bytes())
}

pub fn clear(root: &Path) -> Result<()> {
    crate::io::remove_if_exists(&paths::wizard_path(root))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WizardStep;
    use tempfile::TempDir;

    #[test]
    fn load_requires_init() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(load(dir.path()), Err(LaunchpadError::NotInitialized)));
    }

    #[test]
    fn save_load_clear() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".launchpad")).unwrap();
        assert_eq!(load(dir.path()).unwrap(), WizardState::new());

        let mut state = WizardState::new();
        state.go_to_step(WizardStep::Configure);
        state.import_from_env("A=1\n");
        save(dir.path(), &state).unwrap();
        assert_eq!(load(dir.path()).unwrap(), state);

        clear(dir.path()).unwrap();
        assert_eq!(load(dir.path()).unwrap(), WizardState::new());
    }
}
