pub mod branches;
pub mod config;
pub mod draft;
pub mod env;
pub mod error;
pub mod io;
pub mod paths;
pub mod project;
pub mod types;
pub mod validate;
pub mod wizard;

pub use error::{LaunchpadError, Result};
pub use wizard::WizardState;
