use launchpad_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    io::ensure_dir(&paths::launchpad_dir(root))?;
    io::ensure_dir(&paths::projects_dir(root))?;

    let data = serde_yaml::to_string(&Config::default())?;
    if io::write_if_missing(&paths::config_path(root), data.as_bytes())? {
        println!("created {}", paths::CONFIG_FILE);
    }
    println!("launchpad initialized in {}", root.display());
    Ok(())
}
