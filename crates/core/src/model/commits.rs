#![forbid(unsafe_code)]

use crate::ids::ProjectName;

/// Ancestry lookups against the version-control system backing a project.
///
/// Implementations must not fail: an unknown commit or project yields an
/// empty list, which callers read as "no ancestry-based candidates".
pub trait CommitInformation {
    /// Parent commit ids of `commit_id`, in the order the VCS reports them.
    fn parent_ids(&self, commit_id: &str, project: &ProjectName) -> Vec<String>;
}

impl<T: CommitInformation + ?Sized> CommitInformation for &T {
    fn parent_ids(&self, commit_id: &str, project: &ProjectName) -> Vec<String> {
        (**self).parent_ids(commit_id, project)
    }
}

/// Fixed parent table, keyed by `(project, commit)`. Useful for replaying
/// recorded ancestry and in tests.
#[derive(Clone, Debug, Default)]
pub struct StaticCommitInformation {
    parents: std::collections::BTreeMap<(String, String), Vec<String>>,
}

impl StaticCommitInformation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parents<I, S>(mut self, project: &ProjectName, commit_id: &str, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents.insert(
            (project.as_str().to_string(), commit_id.to_string()),
            parents.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl CommitInformation for StaticCommitInformation {
    fn parent_ids(&self, commit_id: &str, project: &ProjectName) -> Vec<String> {
        self.parents
            .get(&(project.as_str().to_string(), commit_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
