//! Resolution request store.
//!
//! The store is where proposed conflict resolutions wait for a human
//! decision. Two implementations exist behind the [`ResolutionStore`] trait:
//!
//! - [`LocalStore`]: the in-process collection plus the working-tree
//!   side effects (applying approved resolutions through a
//!   [`ConflictSource`](crate::git::ConflictSource)).
//! - [`RemoteStore`]: a thin HTTP proxy that forwards every operation to a
//!   peer instance's REST surface, for setups where one reviewer instance
//!   serves several agent instances.
//!
//! Callers hold an `Arc<dyn ResolutionStore>` and never care which one they
//! got.

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::{NewResolution, ResolutionRequest};

pub mod local;
pub mod remote;
pub mod sink;

pub use local::LocalStore;
pub use remote::RemoteStore;
pub use sink::{DecisionSink, TracingSink};

/// Identifier reported by `GET /api/health`.
///
/// [`RemoteStore::connect`] refuses to delegate to anything that does not
/// report this value, so a mistyped URL fails at startup instead of at the
/// first proposal.
pub const SERVICE_IDENTIFIER: &str = "mergegate-review";

/// The queue of resolution requests awaiting review.
#[async_trait]
pub trait ResolutionStore: Send + Sync {
    /// Register a proposed resolution and return its id.
    ///
    /// Snapshots the file content and conflict diff at call time. A later
    /// proposal for the same path overwrites the earlier one (ids are
    /// content-addressed from the path).
    async fn propose(&self, new: NewResolution) -> Result<String, StoreError>;

    /// All pending requests, oldest first.
    ///
    /// In review mode, requests without a substantive reason are filtered
    /// out before this returns.
    async fn list(&self) -> Result<Vec<ResolutionRequest>, StoreError>;

    /// Fetch a single pending request by id.
    async fn read(&self, id: &str) -> Result<ResolutionRequest, StoreError>;

    /// Overwrite the proposed file content (a reviewer edit).
    ///
    /// Writes `content` to the file on disk, then refreshes the stored
    /// snapshot and diff.
    async fn update(&self, id: &str, content: &str) -> Result<(), StoreError>;

    /// Apply the resolution to the working tree and retire the request.
    ///
    /// Returns a human-readable message describing what was applied. If
    /// applying fails the request stays pending so the reviewer can retry.
    async fn approve(&self, id: &str, comment: Option<&str>) -> Result<String, StoreError>;

    /// Discard the request without touching the working tree.
    ///
    /// The comment, when present, lands in the project's rejection ledger so
    /// the next proposal for the same file can surface it.
    async fn reject(&self, id: &str, comment: Option<&str>) -> Result<(), StoreError>;
}
