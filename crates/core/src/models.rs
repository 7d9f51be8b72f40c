//! Domain model types used throughout MergeGate.
//!
//! These types bridge the resolution store, web API, and agent tool layer.
//! They serialize in camelCase because the same shapes travel over the REST
//! surface consumed by the review UI and by delegating peers.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resolution kind
// ---------------------------------------------------------------------------

/// How an approved resolution is applied to the working tree.
///
/// `Resolve` and `Add` both stage the file; `Delete` removes it from the
/// index and the working tree. Unknown values in incoming JSON are a
/// deserialization error, not a silent default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionKind {
    #[default]
    Resolve,
    Delete,
    Add,
}

impl std::fmt::Display for ResolutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolve => write!(f, "resolve"),
            Self::Delete => write!(f, "delete"),
            Self::Add => write!(f, "add"),
        }
    }
}

// ---------------------------------------------------------------------------
// Request state
// ---------------------------------------------------------------------------

/// Lifecycle state of a resolution request.
///
/// The live store only ever holds `Pending` entries; a request leaves the
/// collection the moment it is approved or rejected, re-tagged with its
/// terminal state for whoever observes the decision (sinks, snapshots).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    #[default]
    Pending,
    Applied,
    Rejected,
}

// ---------------------------------------------------------------------------
// Resolution request
// ---------------------------------------------------------------------------

/// A proposed conflict resolution awaiting human review.
///
/// The `id` is content-addressed from `file_path` (see [`crate::id`]), so a
/// second proposal for the same file overwrites the first rather than piling
/// up duplicates. `file_content` and `git_diff` are snapshots taken at
/// proposal time; [`update`](crate::store::ResolutionStore::update) refreshes
/// both when a reviewer edits the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionRequest {
    pub id: String,
    /// Path relative to the project root, as git reports it.
    pub file_path: String,
    pub absolute_path: PathBuf,
    pub project_path: PathBuf,
    #[serde(rename = "type", default)]
    pub kind: ResolutionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_diff: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub state: RequestState,
}

impl ResolutionRequest {
    /// Whether `reason` actually explains the resolution.
    ///
    /// Reviewers working in review mode only see requests that carry a
    /// non-empty reason that is more than a generic "resolve"/"resolved"
    /// placeholder.
    pub fn has_substantive_reason(&self) -> bool {
        match &self.reason {
            Some(reason) => {
                let trimmed = reason.trim();
                !trimmed.is_empty()
                    && !trimmed.eq_ignore_ascii_case("resolve")
                    && !trimmed.eq_ignore_ascii_case("resolved")
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// New resolution (proposal input)
// ---------------------------------------------------------------------------

/// Input for proposing a resolution.
///
/// This is also the request body of `POST /api/add`, which is what lets a
/// delegating instance forward proposals to its peer verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResolution {
    pub file_path: String,
    pub absolute_path: PathBuf,
    pub project_path: PathBuf,
    #[serde(rename = "type", default)]
    pub kind: ResolutionKind,
    #[serde(default)]
    pub reason: Option<String>,
}
