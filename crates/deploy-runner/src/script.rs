use launchpad_core::project::slugify;
use launchpad_core::WizardState;

/// The scripted build output for one run, in the order it is emitted.
///
/// The text is filled in from the wizard as it stood when the run started;
/// the number and order of lines never vary.
pub fn lines(state: &WizardState, base_domain: &str) -> Vec<String> {
    let details = &state.project_details;
    let source = state
        .source_code
        .describe()
        .unwrap_or_else(|| "repository".to_string());
    let root = details.root_directory.as_deref().unwrap_or(".");

    vec![
        "Initializing build environment...".to_string(),
        format!("Cloning {source} (branch: {})", details.branch),
        "Cloning completed".to_string(),
        format!("Using root directory: {root}"),
        "Restoring build cache...".to_string(),
        "Installing dependencies...".to_string(),
        "Dependencies installed".to_string(),
        format!("Running build command: {}", details.build_command),
        "Build completed".to_string(),
        "Uploading build outputs...".to_string(),
        "Deploying to edge network...".to_string(),
        format!(
            "Assigning domain {}.{base_domain}",
            slugify(&details.project_name)
        ),
        "Deployment completed".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::types::{RepoRef, SourceType};
    use launchpad_core::wizard::{ProjectDetailsUpdate, SourceCodeUpdate};

    #[test]
    fn script_reflects_wizard() {
        let mut state = WizardState::new();
        state.update_source_code(SourceCodeUpdate {
            source_type: Some(Some(SourceType::Github)),
            github_repo: Some(Some(RepoRef::new("acme", "web"))),
            ..Default::default()
        });
        state.update_project_details(ProjectDetailsUpdate {
            project_name: Some("My App".into()),
            build_command: Some("pnpm build".into()),
            ..Default::default()
        });

        let lines = lines(&state, "launchpad.app");
        assert_eq!(lines.first().map(String::as_str), Some("Initializing build environment..."));
        assert!(lines.contains(&"Cloning acme/web (branch: main)".to_string()));
        assert!(lines.contains(&"Running build command: pnpm build".to_string()));
        assert!(lines.contains(&"Assigning domain my-app.launchpad.app".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Deployment completed"));
    }

    #[test]
    fn line_count_is_fixed() {
        let mut state = WizardState::new();
        let bare = lines(&state, "x.dev").len();
        state.update_project_details(ProjectDetailsUpdate {
            root_directory: Some(Some("apps/web".into())),
            ..Default::default()
        });
        assert_eq!(lines(&state, "x.dev").len(), bare);
    }
}
