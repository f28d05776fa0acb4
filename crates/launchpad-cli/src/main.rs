mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, env::EnvSubcommand, source::SourceSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "launchpad",
    about = "Project-creation wizard: pick a source, configure the project, deploy",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .launchpad/ or .git/)
    #[arg(long, global = true, env = "LAUNCHPAD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize launchpad in the current directory
    Init,

    /// Show the wizard: current step, gating, validation, and data
    Status,

    /// Step 1: choose where the code comes from
    Source {
        #[command(subcommand)]
        subcommand: SourceSubcommand,
    },

    /// Step 2: set project details
    Details(cmd::details::DetailsArgs),

    /// Step 2: edit environment variables
    Env {
        #[command(subcommand)]
        subcommand: EnvSubcommand,
    },

    /// Validate the current step and advance
    Next,

    /// Go back one step
    Back,

    /// Jump straight to a step (1, 2, 3 or source, configure, deploy)
    Goto { step: String },

    /// Step 3: run the deployment and stream its log
    Deploy,

    /// Record an externally detected deployment failure
    Fail { message: String },

    /// Re-run a failed deployment
    Retry,

    /// Save the deployed project and clear the wizard
    Finish,

    /// Discard the wizard and start over
    Reset,

    /// List created projects
    Projects,

    /// Show or validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Deploy | Commands::Retry => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Source { subcommand } => cmd::source::run(&root, subcommand, cli.json),
        Commands::Details(args) => cmd::details::run(&root, args, cli.json),
        Commands::Env { subcommand } => cmd::env::run(&root, subcommand, cli.json),
        Commands::Next => cmd::step::next(&root, cli.json),
        Commands::Back => cmd::step::back(&root, cli.json),
        Commands::Goto { step } => cmd::step::goto(&root, &step, cli.json),
        Commands::Deploy => cmd::deploy::run(&root, cli.json),
        Commands::Fail { message } => cmd::deploy::fail(&root, &message, cli.json),
        Commands::Retry => cmd::deploy::retry(&root, cli.json),
        Commands::Finish => cmd::finish::run(&root, cli.json),
        Commands::Reset => cmd::step::reset(&root, cli.json),
        Commands::Projects => cmd::finish::list(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
