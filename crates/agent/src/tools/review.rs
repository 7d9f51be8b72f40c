//! Review-queue tools.
//!
//! These walk the pending resolution queue and hand down decisions. They go
//! through the same [`ResolutionStore`] the web surface uses, so a decision
//! made here and one made in the browser are indistinguishable to the store.
//!
//! [`ResolutionStore`]: mergegate_core::store::ResolutionStore

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use mergegate_core::errors::StoreError;
use mergegate_core::models::ResolutionKind;

use super::{page_number, pretty_json, PAGE_SIZE};
use crate::registry::{Tool, ToolResponse};
use crate::ToolContext;

// ---------------------------------------------------------------------------
// list_pending_resolutions
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
struct ListPendingArgs {
    page: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingItem {
    id: String,
    file_path: String,
    #[serde(rename = "type")]
    kind: ResolutionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingPage {
    pending: Vec<PendingItem>,
    total: usize,
    page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_more: Option<bool>,
}

pub struct ListPendingTool {
    ctx: Arc<ToolContext>,
}

impl ListPendingTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ListPendingTool {
    fn name(&self) -> &'static str {
        "list_pending_resolutions"
    }

    fn description(&self) -> &'static str {
        "List resolutions waiting for review, with their IDs, file paths and types"
    }

    async fn call(&self, args: serde_json::Value) -> ToolResponse {
        let args: ListPendingArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return ToolResponse::error(format!("Invalid arguments: {e}")),
        };

        if !self.ctx.review_mode {
            return ToolResponse::error("This tool is only available in review mode (--review).");
        }

        let pending = match self.ctx.store.list().await {
            Ok(pending) => pending,
            Err(e) => return ToolResponse::error(format!("Error: {e}")),
        };

        let page = page_number(args.page);
        let start = (page - 1) * PAGE_SIZE;
        let end = start + PAGE_SIZE;

        let items: Vec<PendingItem> = pending
            .iter()
            .skip(start)
            .take(PAGE_SIZE)
            .map(|request| PendingItem {
                id: request.id.clone(),
                file_path: request.file_path.clone(),
                kind: request.kind,
                reason: request.reason.clone(),
                timestamp: request.timestamp.to_rfc3339(),
            })
            .collect();

        let body = PendingPage {
            pending: items,
            total: pending.len(),
            page,
            has_more: (pending.len() > end).then_some(true),
        };

        ToolResponse::ok(pretty_json(&body))
    }
}

// ---------------------------------------------------------------------------
// read_pending_resolution
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ReadPendingArgs {
    id: String,
}

pub struct ReadPendingTool {
    ctx: Arc<ToolContext>,
}

impl ReadPendingTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ReadPendingTool {
    fn name(&self) -> &'static str {
        "read_pending_resolution"
    }

    fn description(&self) -> &'static str {
        "Read a pending resolution in full: file content, diff, and reason"
    }

    async fn call(&self, args: serde_json::Value) -> ToolResponse {
        let args: ReadPendingArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return ToolResponse::error(format!("Invalid arguments: {e}")),
        };

        match self.ctx.store.read(&args.id).await {
            Ok(request) => ToolResponse::ok(pretty_json(&request)),
            Err(StoreError::NotFound(id)) => {
                ToolResponse::error(format!("Error: Pending resolution with ID {id} not found."))
            }
            Err(e) => ToolResponse::error(format!("Error: {e}")),
        }
    }
}

// ---------------------------------------------------------------------------
// resolve_pending_resolution
// ---------------------------------------------------------------------------

#[derive(Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Decision {
    Approve,
    Reject,
}

#[derive(Deserialize)]
struct ResolvePendingArgs {
    id: String,
    decision: Decision,
    comment: Option<String>,
}

pub struct ResolvePendingTool {
    ctx: Arc<ToolContext>,
}

impl ResolvePendingTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ResolvePendingTool {
    fn name(&self) -> &'static str {
        "resolve_pending_resolution"
    }

    fn description(&self) -> &'static str {
        "Approve a pending resolution (applies it to the index) or reject it with a reason"
    }

    async fn call(&self, args: serde_json::Value) -> ToolResponse {
        let args: ResolvePendingArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return ToolResponse::error(format!("Invalid arguments: {e}")),
        };

        let comment = args
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        // A rejection with no reason helps nobody: the proposer would retry
        // the same approach blind. Refuse before touching the store.
        if args.decision == Decision::Reject && comment.is_none() {
            return ToolResponse::error("Error: Comment is required when rejecting a resolution.");
        }

        match args.decision {
            Decision::Approve => match self.ctx.store.approve(&args.id, comment).await {
                Ok(message) => {
                    info!(id = %args.id, "resolution approved via tool");
                    ToolResponse::ok(message)
                }
                Err(e) => ToolResponse::error(format!("Error: {e}")),
            },
            Decision::Reject => match self.ctx.store.reject(&args.id, comment).await {
                Ok(()) => {
                    info!(id = %args.id, "resolution rejected via tool");
                    ToolResponse::ok("Rejected resolution.")
                }
                Err(e) => ToolResponse::error(format!("Error: {e}")),
            },
        }
    }
}
