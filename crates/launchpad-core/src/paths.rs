use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const LAUNCHPAD_DIR: &str = ".launchpad";
pub const PROJECTS_DIR: &str = ".launchpad/projects";

pub const CONFIG_FILE: &str = ".launchpad/config.yaml";
pub const WIZARD_FILE: &str = ".launchpad/wizard.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn launchpad_dir(root: &Path) -> PathBuf {
    root.join(LAUNCHPAD_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn wizard_path(root: &Path) -> PathBuf {
    root.join(WIZARD_FILE)
}

pub fn projects_dir(root: &Path) -> PathBuf {
    root.join(PROJECTS_DIR)
}

pub fn project_path(root: &Path, slug: &str) -> PathBuf {
    projects_dir(root).join(format!("{slug}.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_path_is_under_projects_dir() {
        let p = project_path(Path::new("/repo"), "my-app");
        assert_eq!(p, PathBuf::from("/repo/.launchpad/projects/my-app.yaml"));
    }
}
