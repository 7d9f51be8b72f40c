//! Asynchronous git CLI client.
//!
//! Git is driven entirely as a subprocess: no libgit bindings, no index
//! parsing. Everything the store needs is a handful of plumbing commands
//! whose text output we consume.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::status::{parse_porcelain_conflicts, ConflictEntry};
use super::ConflictSource;
use crate::errors::GitError;

/// [`ConflictSource`] backed by the `git` binary.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    async fn run_git(&self, root: &Path, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        cmd.current_dir(root)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(cmd = ?format!("git {}", args.join(" ")), root = %root.display(), "running git command");
        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::BinaryNotFound("git".into())
            } else {
                GitError::IoError(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, %stderr, "git command failed");
            return Err(GitError::CommandFailed { exit_code, stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl ConflictSource for GitCli {
    async fn conflicted_paths(&self, root: &Path) -> Result<Vec<String>, GitError> {
        let output = self
            .run_git(root, &["diff", "--name-only", "--diff-filter=U"])
            .await?;
        let mut paths: Vec<String> = output
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect();
        paths.sort();
        debug!(count = paths.len(), "listed conflicted paths");
        Ok(paths)
    }

    async fn conflicted_with_status(&self, root: &Path) -> Result<Vec<ConflictEntry>, GitError> {
        let output = self.run_git(root, &["status", "--porcelain"]).await?;
        let mut entries = parse_porcelain_conflicts(&output);
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn read_file(&self, absolute: &Path) -> Option<String> {
        tokio::fs::read_to_string(absolute).await.ok()
    }

    async fn diff(&self, path: &str, root: &Path) -> String {
        match self.run_git(root, &["diff", path]).await {
            Ok(output) => output,
            Err(e) => {
                debug!(path, error = %e, "diff unavailable");
                String::new()
            }
        }
    }

    async fn stage(&self, path: &str, root: &Path) -> Result<(), GitError> {
        self.run_git(root, &["add", path]).await?;
        debug!(path, "staged file");
        Ok(())
    }

    async fn remove(&self, path: &str, root: &Path) -> Result<(), GitError> {
        self.run_git(root, &["rm", path]).await?;
        debug!(path, "removed file");
        Ok(())
    }
}
