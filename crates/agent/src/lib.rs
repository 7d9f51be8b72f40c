//! MergeGate agent tool surface.
//!
//! This crate exposes the conflict workflow to a coding agent as named,
//! JSON-argument tools: list and read conflicts, propose resolutions, and
//! (in review mode) walk the pending queue. The transport that carries tool
//! calls lives outside this crate; everything here is transport-agnostic.
//!
//! Tool failures are error-flagged text responses, never transport errors:
//! a rate-limited or misused tool returns an instruction the agent can act
//! on.

pub mod registry;
pub mod resources;
pub mod tools;

use std::sync::Arc;

use mergegate_core::context::ProjectContext;
use mergegate_core::git::ConflictSource;
use mergegate_core::ratelimit::RateLimiter;
use mergegate_core::store::ResolutionStore;

pub use registry::{Tool, ToolInfo, ToolRegistry, ToolResponse};

/// Shared dependencies handed to every tool.
pub struct ToolContext {
    pub store: Arc<dyn ResolutionStore>,
    pub source: Arc<dyn ConflictSource>,
    pub project: Arc<ProjectContext>,
    pub limiter: RateLimiter,
    pub review_mode: bool,
    /// Base URL of the review UI, shown to the agent after a proposal.
    pub review_url: String,
}

impl ToolContext {
    pub fn new(
        store: Arc<dyn ResolutionStore>,
        source: Arc<dyn ConflictSource>,
        project: Arc<ProjectContext>,
        review_mode: bool,
        review_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            source,
            project,
            limiter: RateLimiter::new(),
            review_mode,
            review_url: review_url.into(),
        }
    }
}

/// Build a registry with the full tool set registered.
///
/// The review-queue tools are always registered; outside review mode the
/// queue listing answers with an instruction to rerun with `--review`.
pub async fn build_registry(ctx: Arc<ToolContext>) -> ToolRegistry {
    let registry = ToolRegistry::new();

    registry
        .register(Arc::new(tools::conflicts::ListConflictsTool::new(ctx.clone())))
        .await;
    registry
        .register(Arc::new(tools::conflicts::ReadConflictTool::new(ctx.clone())))
        .await;
    registry
        .register(Arc::new(tools::conflicts::ResolveConflictTool::new(ctx.clone())))
        .await;
    registry
        .register(Arc::new(tools::review::ListPendingTool::new(ctx.clone())))
        .await;
    registry
        .register(Arc::new(tools::review::ReadPendingTool::new(ctx.clone())))
        .await;
    registry
        .register(Arc::new(tools::review::ResolvePendingTool::new(ctx)))
        .await;

    registry
}
