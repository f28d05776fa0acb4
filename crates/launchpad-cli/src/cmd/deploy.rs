use crate::output::print_json;
use anyhow::Context;
use deploy_runner::{DeployEvent, WizardController};
use launchpad_core::types::DeploymentStatus;
use std::path::Path;
use tokio::sync::broadcast::error::RecvError;

type Start = fn(&WizardController) -> launchpad_core::Result<u64>;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    stream(root, json, WizardController::start_deployment)
}

pub fn retry(root: &Path, json: bool) -> anyhow::Result<()> {
    stream(root, json, WizardController::retry_deployment)
}

pub fn fail(root: &Path, message: &str, json: bool) -> anyhow::Result<()> {
    let (_, wizard) = super::open(root)?;
    wizard.mark_failed(message);
    super::save(root, &wizard)?;
    if json {
        print_json(&wizard.snapshot().deployment)
    } else {
        println!("deployment marked failed: {message}");
        Ok(())
    }
}

/// Start a run and print its events until it finishes.
fn stream(root: &Path, json: bool, start: Start) -> anyhow::Result<()> {
    let (_, wizard) = super::open(root)?;
    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let status = rt.block_on(async {
        let mut events = wizard.subscribe();
        let run = start(&wizard)?;
        loop {
            match events.recv().await {
                Ok(event) if event.run() != run => continue,
                Ok(event) => {
                    render(&event, json)?;
                    if event.is_finished() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "deploy output lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
        anyhow::Ok(wizard.deployment_status())
    })?;

    super::save(root, &wizard)?;
    if status != DeploymentStatus::Success {
        anyhow::bail!("deployment ended with status {status}");
    }
    Ok(())
}

fn render(event: &DeployEvent, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        DeployEvent::Started { run } => println!("==> deploy #{run} started"),
        DeployEvent::Log { line, .. } => println!("    {line}"),
        DeployEvent::Finished {
            status,
            deployed_url,
            error,
            ..
        } => {
            println!("==> {status}");
            if let Some(url) = deployed_url {
                println!("    {url}");
            }
            if let Some(err) = error {
                println!("    {err}");
            }
        }
    }
    Ok(())
}
