use crate::output::{print_json, print_table};
use anyhow::Context;
use launchpad_core::draft;
use launchpad_core::project::ProjectRecord;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = draft::load(root).context("failed to load wizard")?;
    let record = ProjectRecord::from_wizard(&state)?;
    record.create(root).context("failed to save project")?;
    draft::clear(root)?;
    tracing::info!(slug = %record.slug, "project created");

    if json {
        print_json(&record)
    } else {
        println!("created project '{}'", record.slug);
        println!("  {}", record.deployed_url);
        Ok(())
    }
}

pub fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let records = ProjectRecord::list(root)?;
    if json {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("no projects");
        return Ok(());
    }
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.slug.clone(),
                r.source.describe().unwrap_or_default(),
                r.details.branch.clone(),
                r.deployed_url.clone(),
            ]
        })
        .collect();
    print_table(&["SLUG", "SOURCE", "BRANCH", "URL"], rows);
    Ok(())
}
