//! Conflict discovery and proposal tools.
//!
//! These three tools are the agent's whole view of the working tree:
//! `list_conflicts` enumerates unmerged paths under stable 1-based ids,
//! `read_conflict` returns one file's marker-laden content, and
//! `resolve_conflict` queues a resolution proposal for human review.
//!
//! Every tool is rate limited. The resolve limiter deliberately answers
//! with a prompt to re-check the resolution instead of a technical error:
//! an agent burning through proposals is usually guessing.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use mergegate_core::models::{NewResolution, ResolutionKind};

use super::{page_number, pretty_json, PAGE_SIZE};
use crate::registry::{Tool, ToolResponse};
use crate::ToolContext;

const WINDOW: Duration = Duration::from_secs(60);
const LIST_LIMIT: usize = 2;
const READ_LIMIT: usize = 5;
const RESOLVE_LIMIT: usize = 3;

/// Parse a 1-based conflict id into an index.
fn parse_index(id: &str, len: usize) -> Option<usize> {
    let n = id.trim().parse::<usize>().ok()?;
    if (1..=len).contains(&n) {
        Some(n - 1)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// list_conflicts
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
struct ListConflictsArgs {
    page: Option<u64>,
    extension: Option<String>,
    path: Option<String>,
}

pub struct ListConflictsTool {
    ctx: Arc<ToolContext>,
}

impl ListConflictsTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ListConflictsTool {
    fn name(&self) -> &'static str {
        "list_conflicts"
    }

    fn description(&self) -> &'static str {
        "List conflicted files as a map of ID to path, filterable by extension or path substring"
    }

    async fn call(&self, args: serde_json::Value) -> ToolResponse {
        let args: ListConflictsArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return ToolResponse::error(format!("Invalid arguments: {e}")),
        };

        if !self.ctx.limiter.check("list_conflicts", LIST_LIMIT, WINDOW) {
            return ToolResponse::error(format!(
                "Rate limit exceeded. You can only list conflicts {LIST_LIMIT} times per minute."
            ));
        }

        let files = match self.ctx.source.conflicted_paths(self.ctx.project.project_root()).await {
            Ok(files) => files,
            Err(e) => return ToolResponse::error(e.to_string()),
        };

        // Ids are assigned over the full list before any filter runs, so
        // the same file keeps the same id no matter how the agent filters.
        let mut filtered: Vec<(usize, String)> = files
            .into_iter()
            .enumerate()
            .map(|(index, path)| (index + 1, path))
            .collect();

        if let Some(extension) = &args.extension {
            let extension = if extension.starts_with('.') {
                extension.clone()
            } else {
                format!(".{extension}")
            };
            filtered.retain(|(_, path)| path.ends_with(&extension));
        }
        if let Some(needle) = &args.path {
            filtered.retain(|(_, path)| path.contains(needle.as_str()));
        }

        let page = page_number(args.page);
        let start = (page - 1) * PAGE_SIZE;
        let end = start + PAGE_SIZE;

        let mut map = serde_json::Map::new();
        for (id, path) in filtered.iter().skip(start).take(PAGE_SIZE) {
            map.insert(id.to_string(), serde_json::Value::String(path.clone()));
        }
        if filtered.len() > end {
            map.insert(
                "isMoreConflict".to_string(),
                serde_json::Value::String("true".to_string()),
            );
        }

        ToolResponse::ok(pretty_json(&serde_json::Value::Object(map)))
    }
}

// ---------------------------------------------------------------------------
// read_conflict
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ReadConflictArgs {
    id: String,
}

pub struct ReadConflictTool {
    ctx: Arc<ToolContext>,
}

impl ReadConflictTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ReadConflictTool {
    fn name(&self) -> &'static str {
        "read_conflict"
    }

    fn description(&self) -> &'static str {
        "Read the content of a conflicted file by its list_conflicts ID"
    }

    async fn call(&self, args: serde_json::Value) -> ToolResponse {
        let args: ReadConflictArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return ToolResponse::error(format!("Invalid arguments: {e}")),
        };

        if !self.ctx.limiter.check("read_conflict", READ_LIMIT, WINDOW) {
            return ToolResponse::error(format!(
                "Rate limit exceeded. You can only read {READ_LIMIT} conflicts per minute."
            ));
        }

        let files = match self.ctx.source.conflicted_paths(self.ctx.project.project_root()).await {
            Ok(files) => files,
            Err(e) => return ToolResponse::error(e.to_string()),
        };
        let Some(index) = parse_index(&args.id, files.len()) else {
            return ToolResponse::error("Invalid ID.");
        };

        let path = &files[index];
        match self.ctx.source.read_file(&self.ctx.project.absolute_path(path)).await {
            Some(content) => ToolResponse::ok(content),
            None => ToolResponse::error(format!("Could not read file: {path}")),
        }
    }
}

// ---------------------------------------------------------------------------
// resolve_conflict
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
struct ResolveConflictArgs {
    id: Option<String>,
    path: Option<String>,
    #[serde(rename = "type")]
    kind: Option<ResolutionKind>,
    reason: Option<String>,
    force: Option<bool>,
}

pub struct ResolveConflictTool {
    ctx: Arc<ToolContext>,
}

impl ResolveConflictTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    /// Turn a caller-supplied path into the repository-relative form git
    /// reports. Absolute paths inside the project are relativized; anything
    /// else is passed through for the membership check to refuse.
    fn normalize(&self, raw: &str) -> String {
        let path = Path::new(raw);
        if path.is_absolute() {
            path.strip_prefix(self.ctx.project.project_root())
                .map(|rel| rel.to_string_lossy().into_owned())
                .unwrap_or_else(|_| raw.to_string())
        } else {
            raw.to_string()
        }
    }
}

#[async_trait]
impl Tool for ResolveConflictTool {
    fn name(&self) -> &'static str {
        "resolve_conflict"
    }

    fn description(&self) -> &'static str {
        "Propose a resolution for a conflicted file; a human approves or rejects it in the review UI"
    }

    async fn call(&self, args: serde_json::Value) -> ToolResponse {
        let args: ResolveConflictArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return ToolResponse::error(format!("Invalid arguments: {e}")),
        };

        if args.id.is_none() && args.path.is_none() {
            return ToolResponse::error("Either id or path must be provided.");
        }

        if !args.force.unwrap_or(false)
            && !self.ctx.limiter.check("resolve_conflict", RESOLVE_LIMIT, WINDOW)
        {
            return ToolResponse::error(
                "Are you sure you have resolved the conflict correctly? Please check again.",
            );
        }

        let files = match self.ctx.source.conflicted_paths(self.ctx.project.project_root()).await {
            Ok(files) => files,
            Err(e) => return ToolResponse::error(e.to_string()),
        };

        let file = if let Some(id) = &args.id {
            match parse_index(id, files.len()) {
                Some(index) => files[index].clone(),
                None => return ToolResponse::error("Invalid ID."),
            }
        } else {
            // args.path is present, the early return above covered the rest.
            let normalized = self.normalize(args.path.as_deref().unwrap_or(""));
            if !files.iter().any(|f| *f == normalized) {
                return ToolResponse::error(format!(
                    "File not found in conflicted files. Searched for: {normalized}"
                ));
            }
            normalized
        };

        let new = NewResolution {
            file_path: file.clone(),
            absolute_path: self.ctx.project.absolute_path(&file),
            project_path: self.ctx.project.project_root().to_path_buf(),
            kind: args.kind.unwrap_or_default(),
            reason: args.reason,
        };
        let kind = new.kind;

        if let Err(e) = self.ctx.store.propose(new).await {
            warn!(file = %file, error = %e, "failed to queue resolution");
            return ToolResponse::error(e.to_string());
        }

        let mut text = format!(
            "Resolution request queued for review.\n\n\
             File: {file}\n\
             Type: {kind}\n\
             Review UI: {url}\n\n\
             A human reviewer will approve or reject it there.",
            url = self.ctx.review_url,
        );
        if let Some(prior) = self.ctx.project.last_rejection(&file) {
            text.push_str(&format!(
                "\n\nNote: the last proposal for this file was rejected: {prior}"
            ));
        }

        ToolResponse::ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::Fixture;

    #[tokio::test]
    async fn test_list_assigns_stable_ids() {
        let fx = Fixture::new(&["src/a.rs", "src/b.ts", "docs/c.md"], false);
        let tool = ListConflictsTool::new(fx.ctx.clone());

        let response = tool.call(serde_json::json!({})).await;
        assert!(!response.is_error);
        let body: serde_json::Value = serde_json::from_str(&response.text).unwrap();
        assert_eq!(body["1"], "docs/c.md");
        assert_eq!(body["2"], "src/a.rs");
        assert_eq!(body["3"], "src/b.ts");
        assert!(body.get("isMoreConflict").is_none());
    }

    #[tokio::test]
    async fn test_list_filters_keep_original_ids() {
        let fx = Fixture::new(&["src/a.rs", "src/b.ts", "docs/c.md"], false);
        let tool = ListConflictsTool::new(fx.ctx.clone());

        // Extension filter, with and without the leading dot.
        let response = tool.call(serde_json::json!({ "extension": "ts" })).await;
        let body: serde_json::Value = serde_json::from_str(&response.text).unwrap();
        assert_eq!(body.as_object().unwrap().len(), 1);
        assert_eq!(body["3"], "src/b.ts");

        let response = tool.call(serde_json::json!({ "extension": ".md", "path": "docs" })).await;
        let body: serde_json::Value = serde_json::from_str(&response.text).unwrap();
        assert_eq!(body["1"], "docs/c.md");
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_pagination_marker() {
        let many: Vec<String> = (0..45).map(|i| format!("file{i:02}.txt")).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let fx = Fixture::new(&refs, false);
        let tool = ListConflictsTool::new(fx.ctx.clone());

        let response = tool.call(serde_json::json!({})).await;
        let body: serde_json::Value = serde_json::from_str(&response.text).unwrap();
        // 20 entries plus the continuation marker.
        assert_eq!(body.as_object().unwrap().len(), 21);
        assert_eq!(body["isMoreConflict"], "true");

        let response = tool.call(serde_json::json!({ "page": 3 })).await;
        let body: serde_json::Value = serde_json::from_str(&response.text).unwrap();
        assert_eq!(body.as_object().unwrap().len(), 5);
        assert!(body.get("isMoreConflict").is_none());
        assert_eq!(body["41"], "file40.txt");
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_rate_limit() {
        let fx = Fixture::new(&["a.txt"], false);
        let tool = ListConflictsTool::new(fx.ctx.clone());

        assert!(!tool.call(serde_json::json!({})).await.is_error);
        assert!(!tool.call(serde_json::json!({})).await.is_error);
        let response = tool.call(serde_json::json!({})).await;
        assert!(response.is_error);
        assert_eq!(
            response.text,
            "Rate limit exceeded. You can only list conflicts 2 times per minute."
        );

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(!tool.call(serde_json::json!({})).await.is_error);
    }

    #[tokio::test]
    async fn test_read_conflict_by_id() {
        let fx = Fixture::new(&["a.txt", "b.txt"], false);
        fx.write_file("a.txt", "<<<<<<< HEAD\nours\n=======\ntheirs\n>>>>>>> branch\n");
        let tool = ReadConflictTool::new(fx.ctx.clone());

        let response = tool.call(serde_json::json!({ "id": "1" })).await;
        assert!(!response.is_error);
        assert!(response.text.contains("<<<<<<< HEAD"));

        for bad in ["0", "3", "x"] {
            let response = tool.call(serde_json::json!({ "id": bad })).await;
            assert!(response.is_error);
            assert_eq!(response.text, "Invalid ID.");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_rate_limit_message() {
        let fx = Fixture::new(&["a.txt"], false);
        fx.write_file("a.txt", "x");
        let tool = ReadConflictTool::new(fx.ctx.clone());

        for _ in 0..5 {
            assert!(!tool.call(serde_json::json!({ "id": "1" })).await.is_error);
        }
        let response = tool.call(serde_json::json!({ "id": "1" })).await;
        assert!(response.is_error);
        assert_eq!(
            response.text,
            "Rate limit exceeded. You can only read 5 conflicts per minute."
        );
    }

    #[tokio::test]
    async fn test_resolve_requires_id_or_path() {
        let fx = Fixture::new(&["a.txt"], false);
        let tool = ResolveConflictTool::new(fx.ctx.clone());

        let response = tool.call(serde_json::json!({})).await;
        assert!(response.is_error);
        assert_eq!(response.text, "Either id or path must be provided.");
    }

    #[tokio::test]
    async fn test_resolve_by_id_queues_request() {
        let fx = Fixture::new(&["a.txt"], false);
        fx.write_file("a.txt", "merged\n");
        let tool = ResolveConflictTool::new(fx.ctx.clone());

        let response = tool
            .call(serde_json::json!({ "id": "1", "reason": "kept both sides" }))
            .await;
        assert!(!response.is_error, "{}", response.text);
        assert!(response.text.contains("File: a.txt"));
        assert!(response.text.contains("Type: resolve"));
        assert!(response.text.contains(&fx.ctx.review_url));

        let pending = fx.list_pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].reason.as_deref(), Some("kept both sides"));
    }

    #[tokio::test]
    async fn test_resolve_by_absolute_path_normalizes() {
        let fx = Fixture::new(&["src/a.txt"], false);
        fx.write_file_nested("src/a.txt", "merged\n");
        let tool = ResolveConflictTool::new(fx.ctx.clone());

        let absolute = fx.project_root().join("src/a.txt");
        let response = tool
            .call(serde_json::json!({ "path": absolute, "type": "delete" }))
            .await;
        assert!(!response.is_error, "{}", response.text);
        assert!(response.text.contains("Type: delete"));

        let pending = fx.list_pending().await;
        assert_eq!(pending[0].file_path, "src/a.txt");
    }

    #[tokio::test]
    async fn test_resolve_unknown_path() {
        let fx = Fixture::new(&["a.txt"], false);
        let tool = ResolveConflictTool::new(fx.ctx.clone());

        let response = tool.call(serde_json::json!({ "path": "b.txt" })).await;
        assert!(response.is_error);
        assert_eq!(
            response.text,
            "File not found in conflicted files. Searched for: b.txt"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_rate_limit_and_force() {
        let fx = Fixture::new(&["a.txt"], false);
        fx.write_file("a.txt", "x");
        let tool = ResolveConflictTool::new(fx.ctx.clone());

        for _ in 0..3 {
            assert!(!tool.call(serde_json::json!({ "id": "1" })).await.is_error);
        }
        let response = tool.call(serde_json::json!({ "id": "1" })).await;
        assert!(response.is_error);
        assert_eq!(
            response.text,
            "Are you sure you have resolved the conflict correctly? Please check again."
        );

        // `force` bypasses the limiter without recording a call.
        let response = tool.call(serde_json::json!({ "id": "1", "force": true })).await;
        assert!(!response.is_error);
    }

    #[tokio::test]
    async fn test_resolve_surfaces_prior_rejection() {
        let fx = Fixture::new(&["a.txt"], false);
        fx.write_file("a.txt", "x");
        fx.context.record_rejection("a.txt", "keep the feature side");
        let tool = ResolveConflictTool::new(fx.ctx.clone());

        let response = tool.call(serde_json::json!({ "id": "1" })).await;
        assert!(!response.is_error);
        assert!(response
            .text
            .contains("Note: the last proposal for this file was rejected: keep the feature side"));
    }
}
