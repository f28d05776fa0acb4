use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchpadError {
    #[error("not initialized: run 'launchpad init'")]
    NotInitialized,

    #[error("invalid step '{0}': must be 1, 2 or 3")]
    InvalidStep(String),

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("not ready: {0}")]
    NotReady(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, LaunchpadError>;
