//! Presentation-ready rendering of diff text and conflict markers.

pub mod diff;
pub mod markers;

pub use diff::{parse_diff, DiffLine, DiffLineKind, DiffStats, ParsedDiff};
pub use markers::{annotate_conflicts, MarkerSpan, SpanRole};
