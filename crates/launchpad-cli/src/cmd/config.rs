use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use launchpad_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Check the configuration for mistakes
    Validate,
    /// Change deploy settings
    Set {
        /// Domain that deployed projects are served under
        #[arg(long)]
        base_domain: Option<String>,
        /// Shortest pause before a log line
        #[arg(long)]
        min_delay_ms: Option<u64>,
        /// Longest pause before a log line
        #[arg(long)]
        max_delay_ms: Option<u64>,
        /// Pause after the last line before the deploy succeeds
        #[arg(long)]
        completion_delay_ms: Option<u64>,
    },
}

pub fn run(root: &Path, subcommand: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        ConfigSubcommand::Show => show(&Config::load_or_default(root)?, json),
        ConfigSubcommand::Validate => validate(&Config::load_or_default(root)?, json),
        ConfigSubcommand::Set {
            base_domain,
            min_delay_ms,
            max_delay_ms,
            completion_delay_ms,
        } => {
            let mut config = Config::load(root)?;
            let deploy = &mut config.deploy;
            if let Some(domain) = base_domain {
                deploy.base_domain = domain;
            }
            deploy.min_delay_ms = min_delay_ms.unwrap_or(deploy.min_delay_ms);
            deploy.max_delay_ms = max_delay_ms.unwrap_or(deploy.max_delay_ms);
            deploy.completion_delay_ms =
                completion_delay_ms.unwrap_or(deploy.completion_delay_ms);
            config.ensure_valid()?;
            config.save(root).context("failed to save config")?;
            show(&config, json)
        }
    }
}

fn show(config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(config)
    } else {
        print!("{}", serde_yaml::to_string(config)?);
        Ok(())
    }
}

fn validate(config: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();
    if json {
        print_json(&warnings)?;
    } else if warnings.is_empty() {
        println!("config ok");
    } else {
        for w in &warnings {
            let label = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{label}: {}", w.message);
        }
    }
    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config has errors");
    }
    Ok(())
}
