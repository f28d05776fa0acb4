use crate::output::print_json;
use deploy_runner::WizardController;
use launchpad_core::types::WizardStep;
use std::path::Path;

fn report(wizard: &WizardController, json: bool) -> anyhow::Result<()> {
    let step = wizard.current_step();
    if json {
        print_json(&serde_json::json!({
            "current_step": step.number(),
            "name": step.as_str(),
            "title": step.title(),
        }))
    } else {
        println!("step {}: {}", step.number(), step.title());
        Ok(())
    }
}

pub fn next(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, wizard) = super::open(root)?;
    let step = wizard.current_step();

    let validation = wizard.validate_current_step();
    if !validation.is_ok() {
        if json {
            print_json(&validation)?;
        } else {
            for err in validation.errors() {
                println!("  {err}");
            }
        }
        anyhow::bail!("step {} ({}) is incomplete", step.number(), step);
    }
    if !wizard.can_go_to_next_step() {
        anyhow::bail!("cannot advance past step {} ({})", step.number(), step);
    }

    wizard.go_to_next_step();
    super::save(root, &wizard)?;
    report(&wizard, json)
}

pub fn back(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, wizard) = super::open(root)?;
    if wizard.can_go_to_prev_step() {
        wizard.go_to_prev_step();
        super::save(root, &wizard)?;
    } else if !json {
        println!("already at the first step");
    }
    report(&wizard, json)
}

pub fn goto(root: &Path, step: &str, json: bool) -> anyhow::Result<()> {
    let step: WizardStep = step.parse()?;
    let (_, wizard) = super::open(root)?;
    wizard.go_to_step(step);
    super::save(root, &wizard)?;
    report(&wizard, json)
}

pub fn reset(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, wizard) = super::open(root)?;
    wizard.reset_wizard();
    super::save(root, &wizard)?;
    if !json {
        println!("wizard reset");
    }
    report(&wizard, json)
}
