//! Shared per-project state.
//!
//! A [`ProjectContext`] carries the repository root that every subsystem
//! resolves paths against, plus the in-memory rejection ledger: the most
//! recent reviewer rejection comment per file, used to warn an agent away
//! from re-proposing an approach a human already turned down.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Project-scoped state handed to the adapter, store, and tool layers.
#[derive(Debug)]
pub struct ProjectContext {
    project_root: PathBuf,
    rejections: Mutex<HashMap<String, String>>,
}

impl ProjectContext {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            rejections: Mutex::new(HashMap::new()),
        }
    }

    /// Repository root all relative file paths are resolved against.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Resolve a repository-relative path to an absolute one.
    pub fn absolute_path(&self, relative: &str) -> PathBuf {
        self.project_root.join(relative)
    }

    /// Record the reviewer's comment for a rejected proposal. Later
    /// rejections for the same file replace earlier ones.
    pub fn record_rejection(&self, file_path: &str, comment: &str) {
        let mut rejections = self.rejections.lock().expect("rejection ledger lock poisoned");
        rejections.insert(file_path.to_string(), comment.to_string());
    }

    /// Most recent rejection comment for a file, if any.
    ///
    /// The ledger is never pruned: an approval does not erase the memory of
    /// an earlier rejection for the same file.
    pub fn last_rejection(&self, file_path: &str) -> Option<String> {
        let rejections = self.rejections.lock().expect("rejection ledger lock poisoned");
        rejections.get(file_path).cloned()
    }
}
