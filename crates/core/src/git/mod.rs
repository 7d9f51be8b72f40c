//! Git adapter: conflict discovery, file snapshots, staging.

use std::path::Path;

use async_trait::async_trait;

use crate::errors::GitError;

pub mod client;
pub mod status;

pub use client::GitCli;
pub use status::{parse_porcelain_conflicts, ConflictCode, ConflictEntry};

/// Source of merge-conflict information and staging operations.
///
/// The production implementation shells out to `git`; tests substitute an
/// in-memory fake. All paths handed to `stage`/`remove`/`diff` are relative
/// to `root`.
#[async_trait]
pub trait ConflictSource: Send + Sync {
    /// Sorted list of unmerged paths (`git diff --name-only --diff-filter=U`).
    async fn conflicted_paths(&self, root: &Path) -> Result<Vec<String>, GitError>;

    /// Unmerged paths with their porcelain conflict codes, sorted by path.
    async fn conflicted_with_status(&self, root: &Path) -> Result<Vec<ConflictEntry>, GitError>;

    /// Snapshot a file's current content. `None` when unreadable or absent;
    /// never an error, since a missing snapshot must not block a proposal.
    async fn read_file(&self, absolute: &Path) -> Option<String>;

    /// Working-tree diff for one path. Empty string on any failure.
    async fn diff(&self, path: &str, root: &Path) -> String;

    /// Mark a path resolved (`git add`).
    async fn stage(&self, path: &str, root: &Path) -> Result<(), GitError>;

    /// Remove a path and stage the deletion (`git rm`).
    async fn remove(&self, path: &str, root: &Path) -> Result<(), GitError>;
}
