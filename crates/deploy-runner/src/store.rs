use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use launchpad_core::types::DeploymentStatus;
use launchpad_core::WizardState;
use tokio::sync::{broadcast, watch};
use tracing::warn;

use crate::event::DeployEvent;

// ─── Store ────────────────────────────────────────────────────────────────

struct Inner {
    wizard: WizardState,
    /// Bumped whenever the active run is superseded. A timer callback only
    /// writes while its own generation is still current.
    generation: u64,
}

/// The single wizard instance shared between the controller and its timer
/// chain. The lock is never held across an `.await`.
pub(crate) struct Store {
    inner: Mutex<Inner>,
    events: broadcast::Sender<DeployEvent>,
    status: watch::Sender<DeploymentStatus>,
}

impl Store {
    pub(crate) fn new(wizard: WizardState) -> Self {
        let (events, _) = broadcast::channel(256);
        let (status, _) = watch::channel(wizard.deployment.status);
        Self {
            inner: Mutex::new(Inner {
                wizard,
                generation: 0,
            }),
            events,
            status,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e: PoisonError<_>| {
            warn!("wizard state lock was poisoned; recovering");
            e.into_inner()
        })
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&WizardState) -> R) -> R {
        f(&self.lock().wizard)
    }

    /// Mutate the wizard and publish the resulting deployment status.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut WizardState) -> R) -> R {
        let mut inner = self.lock();
        let out = f(&mut inner.wizard);
        self.status.send_replace(inner.wizard.deployment.status);
        out
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<DeployEvent> {
        self.events.subscribe()
    }

    pub(crate) fn watch_status(&self) -> watch::Receiver<DeploymentStatus> {
        self.status.subscribe()
    }

    /// Supersede whatever run is in flight without touching the wizard.
    pub(crate) fn invalidate(&self) {
        self.lock().generation += 1;
    }

    // ─── Run lifecycle ────────────────────────────────────────────────────

    /// Start a new run: supersede the old one and enter `building` with
    /// empty logs. Returns the new run's generation.
    pub(crate) fn begin_run(&self) -> u64 {
        let mut inner = self.lock();
        inner.generation += 1;
        let run = inner.generation;
        inner.wizard.deployment.begin(Utc::now());
        self.status.send_replace(inner.wizard.deployment.status);
        let _ = self.events.send(DeployEvent::Started { run });
        run
    }

    /// Append a scripted line if `run` is still current.
    pub(crate) fn append_log(&self, run: u64, line: &str) -> bool {
        let mut inner = self.lock();
        if inner.generation != run {
            return false;
        }
        inner.wizard.deployment.append_log(line);
        let _ = self.events.send(DeployEvent::Log {
            run,
            line: line.to_string(),
        });
        true
    }

    /// Mark `run` successful if it is still current.
    pub(crate) fn complete(&self, run: u64, deployed_url: String) -> bool {
        let mut inner = self.lock();
        if inner.generation != run {
            return false;
        }
        inner
            .wizard
            .deployment
            .succeed(deployed_url.clone(), Utc::now());
        self.status.send_replace(DeploymentStatus::Success);
        let _ = self.events.send(DeployEvent::Finished {
            run,
            status: DeploymentStatus::Success,
            deployed_url: Some(deployed_url),
            error: None,
        });
        true
    }

    /// Record an externally detected failure and stop the active run.
    pub(crate) fn fail(&self, error: String) {
        let mut inner = self.lock();
        let run = inner.generation;
        inner.generation += 1;
        inner.wizard.deployment.fail(error.clone(), Utc::now());
        self.status.send_replace(DeploymentStatus::Failed);
        let _ = self.events.send(DeployEvent::Finished {
            run,
            status: DeploymentStatus::Failed,
            deployed_url: None,
            error: Some(error),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_generation_is_rejected() {
        let store = Store::new(WizardState::new());
        let first = store.begin_run();
        assert!(store.append_log(first, "one"));

        let second = store.begin_run();
        assert_ne!(first, second);
        assert!(!store.append_log(first, "stale"));
        assert!(!store.complete(first, "https://x".into()));
        assert!(store.append_log(second, "fresh"));

        store.read(|w| {
            assert_eq!(w.deployment.logs, vec!["fresh".to_string()]);
            assert_eq!(w.deployment.status, DeploymentStatus::Building);
        });
    }

    #[test]
    fn write_publishes_status() {
        let store = Store::new(WizardState::new());
        let rx = store.watch_status();
        store.write(|w| w.deployment.status = DeploymentStatus::Failed);
        assert_eq!(*rx.borrow(), DeploymentStatus::Failed);
    }

    #[test]
    fn fail_supersedes_active_run() {
        let store = Store::new(WizardState::new());
        let run = store.begin_run();
        store.fail("registry unreachable".into());
        assert!(!store.append_log(run, "late"));
        store.read(|w| {
            assert_eq!(w.deployment.status, DeploymentStatus::Failed);
            assert_eq!(w.deployment.error.as_deref(), Some("registry unreachable"));
        });
    }

    #[test]
    fn events_follow_run() {
        let store = Store::new(WizardState::new());
        let mut rx = store.subscribe();
        let run = store.begin_run();
        store.append_log(run, "hello");
        store.complete(run, "https://a.launchpad.app".into());

        assert_eq!(rx.try_recv().unwrap(), DeployEvent::Started { run });
        assert_eq!(
            rx.try_recv().unwrap(),
            DeployEvent::Log {
                run,
                line: "hello".into()
            }
        );
        assert!(rx.try_recv().unwrap().is_finished());
    }
}
