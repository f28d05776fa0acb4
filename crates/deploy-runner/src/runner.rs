use std::sync::Arc;
use std::time::Duration;

use launchpad_core::config::DeployConfig;
use launchpad_core::{LaunchpadError, Result};
use rand::Rng;
use tracing::{debug, info};

use crate::store::Store;

// ─── DelayPolicy ──────────────────────────────────────────────────────────

/// Timing of a simulated run: a uniformly random pause in `[min, max]`
/// before every scripted line, then one fixed pause before success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    min: Duration,
    max: Duration,
    completion: Duration,
}

impl DelayPolicy {
    pub fn new(min: Duration, max: Duration, completion: Duration) -> Result<Self> {
        if min > max {
            return Err(LaunchpadError::InvalidConfig(format!(
                "minimum line delay {min:?} exceeds maximum {max:?}"
            )));
        }
        Ok(Self {
            min,
            max,
            completion,
        })
    }

    pub fn from_config(cfg: &DeployConfig) -> Result<Self> {
        Self::new(cfg.min_delay(), cfg.max_delay(), cfg.completion_delay())
    }

    /// No pauses at all.
    pub fn immediate() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
            completion: Duration::ZERO,
        }
    }

    /// Draw the pause before the next line.
    pub fn sample(&self) -> Duration {
        let span = u64::try_from((self.max - self.min).as_nanos()).unwrap_or(u64::MAX);
        if span == 0 {
            return self.min;
        }
        self.min + Duration::from_nanos(rand::thread_rng().gen_range(0..=span))
    }

    pub fn completion(&self) -> Duration {
        self.completion
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        let cfg = DeployConfig::default();
        Self {
            min: cfg.min_delay(),
            max: cfg.max_delay(),
            completion: cfg.completion_delay(),
        }
    }
}

// ─── Run ──────────────────────────────────────────────────────────────────

/// Everything a timer chain needs, captured when the run starts.
pub(crate) struct RunPlan {
    pub run: u64,
    pub lines: Vec<String>,
    pub deployed_url: String,
    pub policy: DelayPolicy,
}

/// Drain the script into the store one line at a time, then mark success.
///
/// Stops quietly as soon as the run is superseded; the task may also be
/// aborted at any await point.
pub(crate) async fn drive(store: Arc<Store>, plan: RunPlan) {
    let RunPlan {
        run,
        lines,
        deployed_url,
        policy,
    } = plan;
    let (min_delay, max_delay) = policy.bounds();
    info!(
        run,
        lines = lines.len(),
        ?min_delay,
        ?max_delay,
        "deploy run started"
    );

    for line in &lines {
        let delay = policy.sample();
        tokio::time::sleep(delay).await;
        if !store.append_log(run, line) {
            debug!(run, "deploy run superseded; dropping remaining lines");
            return;
        }
        debug!(run, line = %line, "deploy log");
    }

    tokio::time::sleep(policy.completion()).await;
    if store.complete(run, deployed_url.clone()) {
        info!(run, url = %deployed_url, "deploy run succeeded");
    } else {
        debug!(run, "deploy run superseded before completion");
    }
}
