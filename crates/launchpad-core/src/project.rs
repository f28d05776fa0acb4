use crate::error::{LaunchpadError, Result};
use crate::paths;
use crate::types::DeploymentStatus;
use crate::wizard::{ProjectDetails, SourceCode, WizardState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reduce a project name to a DNS label: lowercase ASCII alphanumerics with
/// single hyphens between runs, never leading or trailing.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("project");
    }
    slug
}

/// Public URL of a deployed project.
pub fn deployed_url(project_name: &str, base_domain: &str) -> String {
    format!("https://{}.{}", slugify(project_name), base_domain)
}

// ---------------------------------------------------------------------------
// ProjectRecord
// ---------------------------------------------------------------------------

/// A finished wizard, as handed to the project store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub slug: String,
    pub source: SourceCode,
    pub details: ProjectDetails,
    pub deployed_url: String,
    pub created_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// Build a record from a wizard whose deployment succeeded.
    pub fn from_wizard(state: &WizardState) -> Result<Self> {
        let dep = &state.deployment;
        if dep.status != DeploymentStatus::Success {
            return Err(LaunchpadError::NotReady(format!(
                "deployment is {}, expected success",
                dep.status
            )));
        }
        let deployed_url = dep
            .deployed_url
            .clone()
            .ok_or_else(|| LaunchpadError::NotReady("deployment has no URL".to_string()))?;
        Ok(Self {
            slug: slugify(&state.project_details.project_name),
            source: state.source_code.clone(),
            details: state.project_details.clone(),
            deployed_url,
            created_at: Utc::now(),
        })
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let data = std::fs::read_to_string(paths::project_path(root, slug))?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// Persist a new project. Refuses to overwrite an existing slug.
    pub fn create(&self, root: &Path) -> Result<()> {
        let path = paths::project_path(root, &self.slug);
        if path.exists() {
            return Err(LaunchpadError::ProjectExists(self.slug.clone()));
        }
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::projects_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let data = std::fs::read_to_string(&path)?;
            records.push(serde_yaml::from_str::<ProjectRecord>(&data)?);
        }
        records.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(records)
    }
}
