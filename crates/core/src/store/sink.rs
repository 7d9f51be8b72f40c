//! Decision sinks.
//!
//! Every approve/reject decision is forwarded to a [`DecisionSink`] after
//! the store has committed it. Sinks are fire-and-forget: they return
//! nothing and must not fail the decision they observe.

use tracing::info;

use crate::models::ResolutionRequest;

/// Observer for review decisions.
///
/// The request handed over is the retired entry, already re-tagged with its
/// terminal state.
pub trait DecisionSink: Send + Sync {
    fn approved(&self, request: &ResolutionRequest, comment: Option<&str>);
    fn rejected(&self, request: &ResolutionRequest, comment: Option<&str>);
}

/// Default sink: structured log events.
pub struct TracingSink;

impl DecisionSink for TracingSink {
    fn approved(&self, request: &ResolutionRequest, comment: Option<&str>) {
        info!(
            id = %request.id,
            file = %request.file_path,
            kind = %request.kind,
            comment = comment.unwrap_or(""),
            "resolution approved"
        );
    }

    fn rejected(&self, request: &ResolutionRequest, comment: Option<&str>) {
        info!(
            id = %request.id,
            file = %request.file_path,
            kind = %request.kind,
            comment = comment.unwrap_or(""),
            "resolution rejected"
        );
    }
}
