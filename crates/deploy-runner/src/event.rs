use launchpad_core::types::DeploymentStatus;
use serde::{Deserialize, Serialize};

/// Progress of a deploy run, broadcast to every subscriber.
///
/// `run` is the generation number handed out by
/// [`WizardController::start_deployment`](crate::WizardController::start_deployment);
/// renderers use it to ignore output from a run they did not start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeployEvent {
    Started {
        run: u64,
    },
    Log {
        run: u64,
        line: String,
    },
    Finished {
        run: u64,
        status: DeploymentStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deployed_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl DeployEvent {
    pub fn run(&self) -> u64 {
        match self {
            DeployEvent::Started { run }
            | DeployEvent::Log { run, .. }
            | DeployEvent::Finished { run, .. } => *run,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, DeployEvent::Finished { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_tagged() {
        let json = serde_json::to_value(DeployEvent::Finished {
            run: 3,
            status: DeploymentStatus::Success,
            deployed_url: Some("https://my-app.launchpad.app".into()),
            error: None,
        })
        .unwrap();
        assert_eq!(json["type"], "finished");
        assert_eq!(json["status"], "success");
        assert!(json.get("error").is_none());

        let back: DeployEvent =
            serde_json::from_str(r#"{"type":"log","run":3,"line":"Build completed"}"#).unwrap();
        assert_eq!(back.run(), 3);
        assert!(!back.is_finished());
    }
}
