use crate::output::{print_fields, print_json};
use clap::Args;
use launchpad_core::types::AutoDeploy;
use launchpad_core::wizard::ProjectDetailsUpdate;
use std::path::Path;

#[derive(Args)]
pub struct DetailsArgs {
    /// Project name
    #[arg(long)]
    name: Option<String>,
    /// Git branch to deploy
    #[arg(long)]
    branch: Option<String>,
    /// Directory inside the repository that holds the app
    #[arg(long, conflicts_with = "clear_root_dir")]
    root_dir: Option<String>,
    /// Build from the repository root again
    #[arg(long)]
    clear_root_dir: bool,
    /// Command that builds the app
    #[arg(long)]
    build_command: Option<String>,
    /// When to redeploy: commit, pr, or disabled
    #[arg(long)]
    auto_deploy: Option<String>,
}

pub fn run(root: &Path, args: DetailsArgs, json: bool) -> anyhow::Result<()> {
    let (_, wizard) = super::open(root)?;

    let auto_deploy = args
        .auto_deploy
        .as_deref()
        .map(str::parse::<AutoDeploy>)
        .transpose()?;
    let root_directory = if args.clear_root_dir {
        Some(None)
    } else {
        args.root_dir.map(Some)
    };

    wizard.update_project_details(ProjectDetailsUpdate {
        project_name: args.name,
        branch: args.branch,
        root_directory,
        build_command: args.build_command,
        environment_variables: None,
        auto_deploy,
    });
    super::save(root, &wizard)?;

    let details = wizard.snapshot().project_details;
    if json {
        return print_json(&details);
    }
    print_fields(&[
        ("name", details.project_name.clone()),
        ("branch", details.branch.clone()),
        (
            "root dir",
            details.root_directory.clone().unwrap_or_else(|| "./".into()),
        ),
        ("build command", details.build_command.clone()),
        ("auto deploy", details.auto_deploy.to_string()),
        ("env vars", details.environment_variables.len().to_string()),
    ]);
    Ok(())
}
