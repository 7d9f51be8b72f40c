//! In-process resolution store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::context::ProjectContext;
use crate::errors::StoreError;
use crate::git::ConflictSource;
use crate::id::request_id;
use crate::models::{NewResolution, RequestState, ResolutionKind, ResolutionRequest};
use crate::store::sink::DecisionSink;
use crate::store::ResolutionStore;

/// The in-process request collection plus the working-tree side effects.
///
/// A single mutex guards the collection and is held only for the in-memory
/// mutation itself. Adapter calls (snapshots, diffs, staging) and snapshot
/// persistence run on copied data with the lock released, so a slow `git`
/// invocation never blocks other callers.
pub struct LocalStore {
    requests: Mutex<HashMap<String, ResolutionRequest>>,
    source: Arc<dyn ConflictSource>,
    context: Arc<ProjectContext>,
    sink: Arc<dyn DecisionSink>,
    review_mode: bool,
    state_file: Option<PathBuf>,
}

impl LocalStore {
    /// Create a store, loading any previously persisted pending requests
    /// from `state_file`.
    ///
    /// A missing or unreadable snapshot is not fatal: the store starts
    /// empty and logs a warning. Entries that were persisted in a terminal
    /// state are dropped on load.
    pub fn new(
        source: Arc<dyn ConflictSource>,
        context: Arc<ProjectContext>,
        sink: Arc<dyn DecisionSink>,
        review_mode: bool,
        state_file: Option<PathBuf>,
    ) -> Self {
        let requests = state_file
            .as_deref()
            .map(load_snapshot)
            .unwrap_or_default();

        Self {
            requests: Mutex::new(requests),
            source,
            context,
            sink,
            review_mode,
            state_file,
        }
    }

    /// Ledger shared with the tool layer.
    pub fn context(&self) -> &Arc<ProjectContext> {
        &self.context
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, ResolutionRequest>> {
        self.requests.lock().expect("resolution store lock poisoned")
    }

    /// Write the current pending set to the state file, if one is
    /// configured. Failures are logged and swallowed: persistence is a
    /// convenience, not part of the store's contract.
    async fn persist(&self) {
        let Some(path) = &self.state_file else {
            return;
        };

        let mut pending: Vec<ResolutionRequest> = { self.lock().values().cloned().collect() };
        pending.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.file_path.cmp(&b.file_path))
        });

        let json = match serde_json::to_string_pretty(&pending) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize pending snapshot");
                return;
            }
        };

        if let Err(e) = tokio::fs::write(path, json).await {
            warn!(path = %path.display(), error = %e, "failed to persist pending snapshot");
        }
    }
}

fn load_snapshot(path: &std::path::Path) -> HashMap<String, ResolutionRequest> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read pending snapshot");
            return HashMap::new();
        }
    };

    match serde_json::from_str::<Vec<ResolutionRequest>>(&data) {
        Ok(requests) => {
            let map: HashMap<String, ResolutionRequest> = requests
                .into_iter()
                .filter(|r| r.state == RequestState::Pending)
                .map(|r| (r.id.clone(), r))
                .collect();
            info!(path = %path.display(), count = map.len(), "loaded pending resolutions from snapshot");
            map
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid pending snapshot, starting empty");
            HashMap::new()
        }
    }
}

fn none_if_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[async_trait::async_trait]
impl ResolutionStore for LocalStore {
    async fn propose(&self, new: NewResolution) -> Result<String, StoreError> {
        if new.file_path.trim().is_empty() {
            return Err(StoreError::Validation("filePath must not be empty".to_string()));
        }

        let id = request_id(&new.file_path);
        let file_content = self.source.read_file(&new.absolute_path).await;
        let git_diff = none_if_empty(self.source.diff(&new.file_path, &new.project_path).await);

        let request = ResolutionRequest {
            id: id.clone(),
            file_path: new.file_path,
            absolute_path: new.absolute_path,
            project_path: new.project_path,
            kind: new.kind,
            reason: new.reason,
            file_content,
            git_diff,
            timestamp: Utc::now(),
            state: RequestState::Pending,
        };

        debug!(id = %id, file = %request.file_path, kind = %request.kind, "queued resolution request");
        {
            // Same path, same id: a re-proposal replaces the stale entry.
            self.lock().insert(id.clone(), request);
        }
        self.persist().await;

        Ok(id)
    }

    async fn list(&self) -> Result<Vec<ResolutionRequest>, StoreError> {
        let mut pending: Vec<ResolutionRequest> = { self.lock().values().cloned().collect() };

        if self.review_mode {
            pending.retain(ResolutionRequest::has_substantive_reason);
        }
        pending.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.file_path.cmp(&b.file_path))
        });

        Ok(pending)
    }

    async fn read(&self, id: &str) -> Result<ResolutionRequest, StoreError> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, content: &str) -> Result<(), StoreError> {
        let request = self
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        tokio::fs::write(&request.absolute_path, content).await?;
        let git_diff = none_if_empty(self.source.diff(&request.file_path, &request.project_path).await);

        {
            // The request may have been decided while the write was in
            // flight; the saved file stands either way.
            let mut requests = self.lock();
            if let Some(entry) = requests.get_mut(id) {
                entry.file_content = Some(content.to_string());
                entry.git_diff = git_diff;
            }
        }
        self.persist().await;

        Ok(())
    }

    async fn approve(&self, id: &str, comment: Option<&str>) -> Result<String, StoreError> {
        let request = self
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        // Apply before retiring: a failed `git add`/`git rm` leaves the
        // request pending so the reviewer can fix up and retry.
        let message = match request.kind {
            ResolutionKind::Delete => {
                self.source.remove(&request.file_path, &request.project_path).await?;
                format!("Deleted (git rm) {}", request.file_path)
            }
            ResolutionKind::Resolve | ResolutionKind::Add => {
                self.source.stage(&request.file_path, &request.project_path).await?;
                format!("Resolved (git add) {}", request.file_path)
            }
        };

        let mut retired = { self.lock().remove(id) }.unwrap_or(request);
        retired.state = RequestState::Applied;
        self.sink.approved(&retired, comment);
        self.persist().await;

        Ok(message)
    }

    async fn reject(&self, id: &str, comment: Option<&str>) -> Result<(), StoreError> {
        let mut retired = { self.lock().remove(id) }.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        retired.state = RequestState::Rejected;

        if let Some(comment) = comment.filter(|c| !c.trim().is_empty()) {
            self.context.record_rejection(&retired.file_path, comment);
        }
        self.sink.rejected(&retired, comment);
        self.persist().await;

        Ok(())
    }
}
