//! Shared fixture for tool tests: a temp project, an in-memory conflict
//! source, and a real `LocalStore` wired into a `ToolContext`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use mergegate_core::context::ProjectContext;
use mergegate_core::errors::GitError;
use mergegate_core::git::{ConflictCode, ConflictEntry, ConflictSource};
use mergegate_core::models::ResolutionRequest;
use mergegate_core::store::sink::TracingSink;
use mergegate_core::store::ResolutionStore;
use mergegate_core::LocalStore;

use crate::ToolContext;

/// In-memory conflict source. File reads and diffs hit the real
/// filesystem under the fixture's temp dir.
pub(crate) struct FakeSource {
    conflicted: Vec<String>,
    pub(crate) staged: Mutex<Vec<String>>,
    pub(crate) removed: Mutex<Vec<String>>,
    pub(crate) fail_stage: AtomicBool,
}

impl FakeSource {
    fn new(conflicted: Vec<String>) -> Self {
        Self {
            conflicted,
            staged: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
            fail_stage: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ConflictSource for FakeSource {
    async fn conflicted_paths(&self, _root: &Path) -> Result<Vec<String>, GitError> {
        Ok(self.conflicted.clone())
    }

    async fn conflicted_with_status(&self, _root: &Path) -> Result<Vec<ConflictEntry>, GitError> {
        Ok(self
            .conflicted
            .iter()
            .map(|path| ConflictEntry {
                path: path.clone(),
                code: ConflictCode::BothModified,
            })
            .collect())
    }

    async fn read_file(&self, absolute: &Path) -> Option<String> {
        tokio::fs::read_to_string(absolute).await.ok()
    }

    async fn diff(&self, path: &str, _root: &Path) -> String {
        format!("@@ -0,0 +1 @@\n+{path}")
    }

    async fn stage(&self, path: &str, _root: &Path) -> Result<(), GitError> {
        if self.fail_stage.load(Ordering::SeqCst) {
            return Err(GitError::CommandFailed {
                exit_code: 128,
                stderr: format!("fatal: pathspec '{path}' did not match any files"),
            });
        }
        self.staged.lock().unwrap().push(path.to_string());
        Ok(())
    }

    async fn remove(&self, path: &str, _root: &Path) -> Result<(), GitError> {
        self.removed.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

pub(crate) struct Fixture {
    dir: TempDir,
    pub(crate) source: Arc<FakeSource>,
    pub(crate) store: Arc<LocalStore>,
    pub(crate) context: Arc<ProjectContext>,
    pub(crate) ctx: Arc<ToolContext>,
}

impl Fixture {
    /// Build a fixture whose source reports `conflicted` (sorted, as git
    /// reports them) and whose tools run with the given review mode.
    pub(crate) fn new(conflicted: &[&str], review_mode: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let mut files: Vec<String> = conflicted.iter().map(|s| s.to_string()).collect();
        files.sort();

        let source = Arc::new(FakeSource::new(files));
        let context = Arc::new(ProjectContext::new(dir.path()));
        let store = Arc::new(LocalStore::new(
            source.clone(),
            context.clone(),
            Arc::new(TracingSink),
            review_mode,
            None,
        ));
        let ctx = Arc::new(ToolContext::new(
            store.clone(),
            source.clone(),
            context.clone(),
            review_mode,
            "http://127.0.0.1:3456",
        ));

        Self {
            dir,
            source,
            store,
            context,
            ctx,
        }
    }

    pub(crate) fn project_root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub(crate) fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).unwrap();
    }

    /// Like `write_file`, but creates intermediate directories first.
    pub(crate) fn write_file_nested(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub(crate) async fn list_pending(&self) -> Vec<ResolutionRequest> {
        self.store.list().await.unwrap()
    }
}
