#![forbid(unsafe_code)]

use cl_core::CommitInformation;
use cl_core::ids::ProjectName;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Parent lookups through the `git` CLI against one repository.
#[derive(Clone, Debug)]
pub(crate) struct GitCommitInformation {
    repo: PathBuf,
    git_bin: String,
}

impl GitCommitInformation {
    pub(crate) fn new(repo: impl Into<PathBuf>, git_bin: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            git_bin: git_bin.into(),
        }
    }
}

impl CommitInformation for GitCommitInformation {
    fn parent_ids(&self, commit_id: &str, project: &ProjectName) -> Vec<String> {
        let commit_id = commit_id.trim();
        if commit_id.is_empty() || commit_id.starts_with('-') {
            tracing::debug!(project = %project, commit_id, "refusing to resolve commit id");
            return Vec::new();
        }

        let output = Command::new(&self.git_bin)
            .arg("-C")
            .arg(&self.repo)
            .args(["rev-list", "--parents", "-n", "1", commit_id, "--"])
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => parse_parents(&output.stdout),
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::debug!(
                    project = %project,
                    commit_id,
                    status = %output.status,
                    stderr = %stderr.trim(),
                    "git could not resolve commit"
                );
                Vec::new()
            }
            Err(err) => {
                tracing::debug!(
                    project = %project,
                    commit_id,
                    git_bin = %self.git_bin,
                    error = %err,
                    "failed to run git"
                );
                Vec::new()
            }
        }
    }
}

/// `rev-list --parents` prints `<commit> <parent>...` on its first line.
fn parse_parents(stdout: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(stdout);
    text.lines()
        .next()
        .map(|line| line.split_whitespace().skip(1).map(str::to_string).collect())
        .unwrap_or_default()
}
