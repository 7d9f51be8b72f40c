//! Shared fixtures for the web API tests: an in-memory git fake and a
//! server spawned on an ephemeral port.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use mergegate_core::context::ProjectContext;
use mergegate_core::errors::GitError;
use mergegate_core::git::{ConflictCode, ConflictEntry, ConflictSource};
use mergegate_core::store::{LocalStore, TracingSink};
use mergegate_web::WebServer;

/// Fakes the git side: conflicts and staging are in-memory, file snapshots
/// hit the real filesystem under the fixture tempdir.
pub struct FakeSource {
    pub conflicted: Mutex<Vec<String>>,
    pub staged: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
    pub fail_stage: AtomicBool,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            conflicted: Mutex::new(Vec::new()),
            staged: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
            fail_stage: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ConflictSource for FakeSource {
    async fn conflicted_paths(&self, _root: &Path) -> Result<Vec<String>, GitError> {
        Ok(self.conflicted.lock().unwrap().clone())
    }

    async fn conflicted_with_status(&self, _root: &Path) -> Result<Vec<ConflictEntry>, GitError> {
        Ok(self
            .conflicted
            .lock()
            .unwrap()
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

    async fn diff(&self, path: &str, root: &Path) -> String {
        match tokio::fs::read_to_string(root.join(path)).await {
            Ok(content) => format!("@@ -0,0 +1 @@\n+{content}"),
            Err(_) => String::new(),
        }
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

/// A running review server backed by a `LocalStore` over a tempdir.
pub struct TestApp {
    pub dir: TempDir,
    pub source: Arc<FakeSource>,
    pub context: Arc<ProjectContext>,
    pub store: Arc<LocalStore>,
    pub base_url: String,
}

impl TestApp {
    pub async fn spawn(review_mode: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let source = Arc::new(FakeSource::new());
        let context = Arc::new(ProjectContext::new(dir.path()));
        let store = Arc::new(LocalStore::new(
            source.clone(),
            context.clone(),
            Arc::new(TracingSink),
            review_mode,
            None,
        ));

        let server = WebServer::new(store.clone(), review_mode);
        let router = server.router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            dir,
            source,
            context,
            store,
            base_url: format!("http://{addr}"),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).unwrap();
    }

    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).unwrap()
    }

    /// Body for `POST /api/add` proposing `name` in this fixture's repo.
    pub fn add_body(&self, name: &str, kind: &str, reason: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "filePath": name,
            "absolutePath": self.dir.path().join(name),
            "projectPath": self.dir.path(),
            "type": kind,
            "reason": reason,
        })
    }
}
