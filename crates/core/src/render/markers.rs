//! Three-way conflict marker annotation.
//!
//! Scans file text for `<<<<<<<` / `=======` / `>>>>>>>` regions and splits
//! each into five role-tagged spans so a presentation layer can style the
//! competing sides distinctly. Text outside the regions passes through
//! untouched, and concatenating all span texts reproduces the input exactly.
//! Escaping is the presenter's job; the roles are the contract here.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Role of a span within annotated file text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanRole {
    /// Text outside any conflict region.
    Text,
    /// The `<<<<<<<` line.
    OursMarker,
    /// Lines between `<<<<<<<` and `=======`.
    OursContent,
    /// The `=======` line.
    Separator,
    /// Lines between `=======` and `>>>>>>>`.
    TheirsContent,
    /// The `>>>>>>>` line.
    TheirsMarker,
}

/// One annotated slice of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSpan {
    pub role: SpanRole,
    pub text: String,
}

// Ours/theirs marker lines may carry a ref name after the seven characters;
// the separator line must be exactly seven equals signs.
fn conflict_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)(^<<<<<<<.*$)([\s\S]*?)(^=======$)([\s\S]*?)(^>>>>>>>.*$)").unwrap()
    })
}

/// Split file text into role-tagged spans around every conflict region.
///
/// Input with no well-formed region comes back as a single `Text` span;
/// empty input produces no spans.
pub fn annotate_conflicts(text: &str) -> Vec<MarkerSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0usize;

    for caps in conflict_regex().captures_iter(text) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        if whole.start() > cursor {
            spans.push(MarkerSpan {
                role: SpanRole::Text,
                text: text[cursor..whole.start()].to_string(),
            });
        }

        let roles = [
            SpanRole::OursMarker,
            SpanRole::OursContent,
            SpanRole::Separator,
            SpanRole::TheirsContent,
            SpanRole::TheirsMarker,
        ];
        for (group, role) in roles.iter().enumerate() {
            if let Some(m) = caps.get(group + 1) {
                spans.push(MarkerSpan {
                    role: *role,
                    text: m.as_str().to_string(),
                });
            }
        }

        cursor = whole.end();
    }

    if cursor < text.len() {
        spans.push(MarkerSpan {
            role: SpanRole::Text,
            text: text[cursor..].to_string(),
        });
    }

    spans
}
