use crate::output::print_json;
use clap::Subcommand;
use launchpad_core::branches::StaticBranches;
use launchpad_core::types::RepoRef;
use std::path::Path;

#[derive(Subcommand)]
pub enum SourceSubcommand {
    /// Import a GitHub repository
    Github {
        /// Repository as owner/name
        repo: String,
        /// Branches the repository has, comma-separated (as listed by GitHub)
        #[arg(long, value_delimiter = ',')]
        branches: Vec<String>,
        /// The repository's default branch
        #[arg(long)]
        default_branch: Option<String>,
    },
    /// Clone a public Git repository by URL
    Public {
        /// Repository URL (https://host/owner/name)
        url: String,
    },
    /// Clear the source selection
    Clear,
}

pub fn run(root: &Path, subcommand: SourceSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, wizard) = super::open(root)?;

    match subcommand {
        SourceSubcommand::Github {
            repo,
            branches,
            default_branch,
        } => {
            let mut repo: RepoRef = repo.parse()?;
            if let Some(b) = default_branch {
                repo = repo.with_default_branch(b);
            }
            let listing = StaticBranches::new().with_repo(repo.full_name(), branches);
            let available = wizard.select_github_repo(repo, &listing)?;
            tracing::debug!(branches = available.len(), "github repository selected");
        }
        SourceSubcommand::Public { url } => wizard.select_public_repo(url),
        SourceSubcommand::Clear => wizard.clear_source(),
    }
    super::save(root, &wizard)?;

    let snap = wizard.snapshot();
    if json {
        print_json(&snap.source_code)?;
    } else {
        match snap.source_code.describe() {
            Some(desc) => println!(
                "source: {desc} (branch: {})",
                snap.project_details.branch
            ),
            None => println!("source: none"),
        }
    }
    Ok(())
}
