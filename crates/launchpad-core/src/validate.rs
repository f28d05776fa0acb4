use crate::types::{SourceType, WizardStep};
use crate::wizard::WizardState;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const MAX_PROJECT_NAME_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Validation result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "errors", rename_all = "snake_case")]
pub enum Validation {
    Ok,
    Invalid(Vec<FieldError>),
}

impl Validation {
    fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Validation::Ok
        } else {
            Validation::Invalid(errors)
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Validation::Ok)
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Validation::Ok => &[],
            Validation::Invalid(errors) => errors,
        }
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static PROJECT_NAME_RE: OnceLock<Regex> = OnceLock::new();
static ENV_KEY_RE: OnceLock<Regex> = OnceLock::new();
static REPO_URL_RE: OnceLock<Regex> = OnceLock::new();

fn project_name_re() -> &'static Regex {
    PROJECT_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._\-]*$").unwrap())
}

fn env_key_re() -> &'static Regex {
    ENV_KEY_RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

fn repo_url_re() -> &'static Regex {
    REPO_URL_RE.get_or_init(|| Regex::new(r"^https?://[^/\s]+/[^\s]+$").unwrap())
}

// ---------------------------------------------------------------------------
// Per-step validators
// ---------------------------------------------------------------------------

pub fn validate_step(state: &WizardState, step: WizardStep) -> Validation {
    match step {
        WizardStep::Source => validate_source(state),
        WizardStep::Configure => validate_details(state),
        WizardStep::Deploy => Validation::Ok,
    }
}

pub fn validate_current_step(state: &WizardState) -> Validation {
    validate_step(state, state.current_step)
}

fn validate_source(state: &WizardState) -> Validation {
    let src = &state.source_code;
    let mut errors = Vec::new();

    match src.source_type {
        None => errors.push(FieldError::new("type", "select a source")),
        Some(SourceType::Public) => match src.public_repo_url.as_deref() {
            None | Some("") => {
                errors.push(FieldError::new("public_repo_url", "repository URL is required"))
            }
            Some(url) if !repo_url_re().is_match(url) => errors.push(FieldError::new(
                "public_repo_url",
                "must be an http(s) URL to a repository",
            )),
            Some(_) => {}
        },
        Some(SourceType::Github) => match &src.github_repo {
            None => errors.push(FieldError::new("github_repo", "select a repository")),
            Some(repo) if repo.owner.is_empty() || repo.name.is_empty() => errors.push(
                FieldError::new("github_repo", "repository must have an owner and a name"),
            ),
            Some(_) => {}
        },
    }

    Validation::from_errors(errors)
}

fn validate_details(state: &WizardState) -> Validation {
    let details = &state.project_details;
    let mut errors = Vec::new();

    let name = details.project_name.as_str();
    if name.is_empty() {
        errors.push(FieldError::new("project_name", "project name is required"));
    } else if name.chars().count() > MAX_PROJECT_NAME_LEN {
        errors.push(FieldError::new(
            "project_name",
            format!("must be at most {MAX_PROJECT_NAME_LEN} characters"),
        ));
    } else if !project_name_re().is_match(name) {
        errors.push(FieldError::new(
            "project_name",
            "may only contain letters, digits, '.', '_' and '-', and must not start with '.' or '-'",
        ));
    }

    if details.branch.is_empty() {
        errors.push(FieldError::new("branch", "branch is required"));
    } else if details.branch.chars().any(char::is_whitespace) {
        errors.push(FieldError::new("branch", "must not contain whitespace"));
    }

    if details.build_command.trim().is_empty() {
        errors.push(FieldError::new("build_command", "build command is required"));
    }

    if let Some(dir) = details.root_directory.as_deref() {
        if dir.starts_with('/') || dir.split('/').any(|part| part == "..") {
            errors.push(FieldError::new(
                "root_directory",
                "must be a relative path inside the repository",
            ));
        }
    }

    for (i, var) in details.environment_variables.iter().enumerate() {
        if var.key.is_empty() {
            if !var.value.is_empty() {
                errors.push(FieldError::new(
                    format!("environment_variables[{i}].key"),
                    "key is required when a value is set",
                ));
            }
        } else if !env_key_re().is_match(&var.key) {
            errors.push(FieldError::new(
                format!("environment_variables[{i}].key"),
                format!("'{}' is not a valid variable name", var.key),
            ));
        }
    }

    Validation::from_errors(errors)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
