//! `deploy-runner`: the simulated deployment stage of the project wizard,
//! and the controller that ties it to the wizard state.
//!
//! # Architecture
//!
//! ```text
//! WizardController   ← navigation, editing, start/retry/fail
//!     │
//!     ▼
//! Store              ← the one WizardState + run generation, behind a mutex
//!     ▲                 broadcasts DeployEvents, publishes status on a watch
//!     │
//! drive()            ← spawned timer chain: sleep, append line, … , succeed
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use deploy_runner::{DeployEvent, WizardController};
//! use launchpad_core::config::DeployConfig;
//!
//! let wizard = WizardController::new(&DeployConfig::default())?;
//! wizard.select_public_repo("https://github.com/acme/web");
//! wizard.go_to_next_step();
//! // ... fill in project details ...
//! wizard.go_to_next_step();
//!
//! let mut events = wizard.subscribe();
//! wizard.start_deployment()?;
//! while let Ok(event) = events.recv().await {
//!     if let DeployEvent::Log { line, .. } = &event {
//!         println!("{line}");
//!     }
//!     if event.is_finished() {
//!         break;
//!     }
//! }
//! ```

pub mod controller;
pub mod event;
pub mod runner;
pub mod script;

pub(crate) mod store;

#[cfg(test)]
mod tests;

pub use controller::WizardController;
pub use event::DeployEvent;
pub use runner::DelayPolicy;
