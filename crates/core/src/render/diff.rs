//! Unified and combined diff parsing.
//!
//! Turns raw `git diff` text into classified line records plus add/delete
//! counts, ready for a presentation layer to style. Combined diffs (merge
//! diffs with two parents, `diff --cc` / `@@@` headers) use two-character
//! line prefixes and are detected once per input.
//!
//! Parsing never fails: malformed input degrades to context lines, and an
//! empty input produces zero records.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Classification of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineKind {
    /// File headers: `diff --git`, `diff --cc`, `index `, `---`, `+++`.
    Header,
    /// Hunk headers: `@@ ... @@` / `@@@ ... @@@`.
    Hunk,
    Addition,
    Deletion,
    Context,
}

/// One classified diff line. `display_line` is the line number in the new
/// file, present only for additions and context lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub kind: DiffLineKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_line: Option<usize>,
}

/// Added/deleted line counts for one diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

/// A fully parsed diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDiff {
    pub stats: DiffStats,
    pub lines: Vec<DiffLine>,
}

fn hunk_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@@ -(\d+)(?:,(\d+))? \+(\d+)").unwrap())
}

fn combined_hunk_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+(\d+)").unwrap())
}

fn is_header(line: &str) -> bool {
    line.starts_with("diff --git")
        || line.starts_with("diff --cc")
        || line.starts_with("index ")
        || line.starts_with("---")
        || line.starts_with("+++")
}

/// Parse raw diff text into classified lines and stats.
pub fn parse_diff(text: &str) -> ParsedDiff {
    if text.trim().is_empty() {
        return ParsedDiff::default();
    }

    let mut lines: Vec<&str> = text.split('\n').collect();
    // A trailing newline yields one empty final slice; it is not a diff
    // line and produces no record.
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let is_combined = lines
        .iter()
        .any(|l| l.starts_with("diff --cc") || l.starts_with("@@@"));

    let mut parsed: Vec<DiffLine> = Vec::with_capacity(lines.len());
    let mut additions = 0usize;
    let mut deletions = 0usize;
    let mut line_number = 0usize;
    let last_index = lines.len().saturating_sub(1);

    for (index, line) in lines.iter().enumerate() {
        let line = *line;

        if is_header(line) {
            parsed.push(DiffLine {
                kind: DiffLineKind::Header,
                content: line.to_string(),
                display_line: None,
            });
            continue;
        }

        if line.starts_with("@@") {
            // Reset the running counter to the new-file start of this hunk.
            // Combined headers carry one +n group per parent plus the merge
            // result; the last group is the result.
            let start = if is_combined {
                combined_hunk_regex()
                    .captures_iter(line)
                    .last()
                    .and_then(|caps| caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()))
            } else {
                hunk_header_regex()
                    .captures(line)
                    .and_then(|caps| caps.get(3).and_then(|m| m.as_str().parse::<usize>().ok()))
            };
            if let Some(n) = start {
                line_number = n.saturating_sub(1);
            }
            parsed.push(DiffLine {
                kind: DiffLineKind::Hunk,
                content: line.to_string(),
                display_line: None,
            });
            continue;
        }

        if is_combined {
            let prefix = line.get(0..2).unwrap_or("");
            let body = line.get(2..).unwrap_or("").to_string();
            match prefix {
                "++" | "+ " | " +" => {
                    additions += 1;
                    line_number += 1;
                    parsed.push(DiffLine {
                        kind: DiffLineKind::Addition,
                        content: body,
                        display_line: Some(line_number),
                    });
                }
                "--" | "- " | " -" => {
                    deletions += 1;
                    parsed.push(DiffLine {
                        kind: DiffLineKind::Deletion,
                        content: body,
                        display_line: None,
                    });
                }
                _ => {
                    line_number += 1;
                    parsed.push(DiffLine {
                        kind: DiffLineKind::Context,
                        content: body,
                        display_line: Some(line_number),
                    });
                }
            }
            continue;
        }

        if line.starts_with('+') {
            additions += 1;
            line_number += 1;
            parsed.push(DiffLine {
                kind: DiffLineKind::Addition,
                content: line[1..].to_string(),
                display_line: Some(line_number),
            });
        } else if line.starts_with('-') {
            deletions += 1;
            parsed.push(DiffLine {
                kind: DiffLineKind::Deletion,
                content: line[1..].to_string(),
                display_line: None,
            });
        } else if !line.trim().is_empty() || index < last_index {
            line_number += 1;
            parsed.push(DiffLine {
                kind: DiffLineKind::Context,
                content: line.strip_prefix(' ').unwrap_or(line).to_string(),
                display_line: Some(line_number),
            });
        }
        // A blank final line is no line at all.
    }

    ParsedDiff {
        stats: DiffStats {
            additions,
            deletions,
        },
        lines: parsed,
    }
}
