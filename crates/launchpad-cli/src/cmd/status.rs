use crate::output::{print_fields, print_json, print_table};
use anyhow::Context;
use launchpad_core::types::WizardStep;
use launchpad_core::validate::{validate_current_step, Validation};
use launchpad_core::{draft, WizardState};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct StatusOutput<'a> {
    current_step: u8,
    title: &'static str,
    can_go_to_next_step: bool,
    can_go_to_prev_step: bool,
    validation: Validation,
    wizard: &'a WizardState,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = draft::load(root).context("failed to load wizard")?;
    let validation = validate_current_step(&state);

    if json {
        return print_json(&StatusOutput {
            current_step: state.current_step.number(),
            title: state.current_step.title(),
            can_go_to_next_step: state.can_go_to_next_step(),
            can_go_to_prev_step: state.can_go_to_prev_step(),
            validation,
            wizard: &state,
        });
    }

    let rows = WizardStep::all()
        .iter()
        .map(|&s| {
            let marker = if s == state.current_step { "→" } else { "" };
            vec![marker.to_string(), s.number().to_string(), s.title().to_string()]
        })
        .collect();
    print_table(&["", "STEP", "TITLE"], rows);
    println!();

    let src = &state.source_code;
    let source = match (src.source_type, src.describe()) {
        (Some(t), Some(desc)) => format!("{t} {desc}"),
        (Some(t), None) => format!("{t} (incomplete)"),
        (None, _) => "none".to_string(),
    };
    let mut fields = vec![("source", source)];
    let details = &state.project_details;
    if !details.project_name.is_empty() {
        fields.push((
            "project",
            format!("{} @ {}", details.project_name, details.branch),
        ));
    }

    let dep = &state.deployment;
    fields.push(("deployment", dep.status.to_string()));
    if let Some(url) = &dep.deployed_url {
        fields.push(("url", url.clone()));
    }
    if let Some(err) = &dep.error {
        fields.push(("error", err.clone()));
    }
    if dep.status.is_terminal() {
        if let Some(d) = dep.duration() {
            fields.push(("duration", format!("{}s", d.num_seconds())));
        }
    }
    print_fields(&fields);

    if !validation.is_ok() {
        println!("\nto continue:");
        for err in validation.errors() {
            println!("  {err}");
        }
    } else if state.can_go_to_next_step() {
        println!("\nready: run 'launchpad next'");
    }
    Ok(())
}
