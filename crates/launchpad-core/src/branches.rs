use crate::error::Result;
use crate::types::RepoRef;
use std::collections::HashMap;

/// Lists the branches of a hosted repository. Implemented by the hosting
/// application's GitHub client.
pub trait BranchSource {
    fn fetch_branches(&self, repo: &RepoRef) -> Result<Vec<String>>;
}

/// In-memory branch listing keyed by `owner/name`.
#[derive(Debug, Clone, Default)]
pub struct StaticBranches {
    repos: HashMap<String, Vec<String>>,
}

impl StaticBranches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, full_name: impl Into<String>, branches: Vec<String>) -> Self {
        self.repos.insert(full_name.into(), branches);
        self
    }
}

impl BranchSource for StaticBranches {
    fn fetch_branches(&self, repo: &RepoRef) -> Result<Vec<String>> {
        Ok(self.repos.get(&repo.full_name()).cloned().unwrap_or_default())
    }
}

/// Choose the branch to preselect after a repository change.
///
/// Keeps `current` when the repository has it (or when nothing is known
/// about the repository), otherwise prefers the repository's default branch,
/// then the first listed branch.
pub fn pick_branch(current: &str, repo: &RepoRef, branches: &[String]) -> String {
    if !current.is_empty() && (branches.is_empty() || branches.iter().any(|b| b == current)) {
        return current.to_string();
    }
    repo.default_branch
        .clone()
        .filter(|d| branches.is_empty() || branches.contains(d))
        .or_else(|| branches.first().cloned())
        .unwrap_or_else(|| current.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn static_branches_lookup() {
        let src = StaticBranches::new().with_repo("acme/web", names(&["main", "dev"]));
        let repo = RepoRef::new("acme", "web");
        assert_eq!(src.fetch_branches(&repo).unwrap(), names(&["main", "dev"]));
        assert!(src
            .fetch_branches(&RepoRef::new("acme", "other"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn keeps_current_when_present() {
        let repo = RepoRef::new("acme", "web").with_default_branch("trunk");
        assert_eq!(pick_branch("main", &repo, &names(&["trunk", "main"])), "main");
    }

    #[test]
    fn falls_back_to_default_then_first() {
        let repo = RepoRef::new("acme", "web").with_default_branch("trunk");
        assert_eq!(pick_branch("main", &repo, &names(&["dev", "trunk"])), "trunk");

        let repo = RepoRef::new("acme", "web");
        assert_eq!(pick_branch("main", &repo, &names(&["dev", "trunk"])), "dev");
    }

    #[test]
    fn unknown_branches_keep_current() {
        let repo = RepoRef::new("acme", "web").with_default_branch("trunk");
        assert_eq!(pick_branch("main", &repo, &[]), "main");
        assert_eq!(pick_branch("", &repo, &[]), "trunk");
    }
}
