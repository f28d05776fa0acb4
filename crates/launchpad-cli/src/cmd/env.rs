use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum EnvSubcommand {
    /// List environment variables with their row numbers
    List,
    /// Append an empty row
    Add,
    /// Overwrite one row
    Set {
        /// Row number as shown by `env list`
        index: usize,
        /// KEY=VALUE
        #[arg(value_parser = parse_kv)]
        pair: (String, String),
    },
    /// Remove one row
    Rm {
        /// Row number as shown by `env list`
        index: usize,
    },
    /// Replace all rows with the contents of a .env file (`-` for stdin)
    Import { file: PathBuf },
    /// Print rows as a .env file
    Export,
}

fn parse_kv(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) => Ok((k.trim().to_string(), v.to_string())),
        None => Err(format!("expected KEY=VALUE, got: {s}")),
    }
}

fn read_input(file: &Path) -> anyhow::Result<String> {
    if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

pub fn run(root: &Path, subcommand: EnvSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, wizard) = super::open(root)?;

    let changed = !matches!(subcommand, EnvSubcommand::List);
    match subcommand {
        EnvSubcommand::List => {}
        EnvSubcommand::Export => {
            print!("{}", wizard.export_to_env());
            return Ok(());
        }
        EnvSubcommand::Add => wizard.add_environment_variable(),
        EnvSubcommand::Set {
            index,
            pair: (key, value),
        } => {
            if index >= wizard.env_vars().len() {
                anyhow::bail!("no environment variable at row {index}");
            }
            wizard.update_environment_variable(index, &key, &value);
        }
        EnvSubcommand::Rm { index } => {
            if index >= wizard.env_vars().len() {
                anyhow::bail!("no environment variable at row {index}");
            }
            wizard.remove_environment_variable(index);
        }
        EnvSubcommand::Import { file } => {
            let content = read_input(&file)?;
            wizard.import_from_env(&content);
        }
    }
    if changed {
        super::save(root, &wizard)?;
    }

    let vars = wizard.env_vars();
    if json {
        return print_json(&vars);
    }
    if vars.is_empty() {
        println!("no environment variables");
        return Ok(());
    }
    let rows = vars
        .iter()
        .enumerate()
        .map(|(i, v)| vec![i.to_string(), v.key.clone(), v.value.clone()])
        .collect();
    print_table(&["#", "KEY", "VALUE"], rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kv_splits_on_first_equals() {
        assert_eq!(
            parse_kv("URL=postgres://u:p@h/db?x=1").unwrap(),
            ("URL".to_string(), "postgres://u:p@h/db?x=1".to_string())
        );
        assert_eq!(parse_kv("EMPTY=").unwrap(), ("EMPTY".to_string(), String::new()));
        assert!(parse_kv("novalue").is_err());
    }
}
