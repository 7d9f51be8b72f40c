//! Porcelain status parsing for unmerged files.
//!
//! `git status --porcelain` reports each path with a two-letter XY code.
//! Seven of those codes mark merge conflicts; everything else is ignored
//! here. Each code carries a human label (matching git's long-format status
//! text) and a suggested resolution type for the proposing agent.

use serde::{Deserialize, Serialize};

/// Two-letter porcelain code of an unmerged path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictCode {
    /// `DD`: deleted on both sides.
    BothDeleted,
    /// `AU`: added by us, unmerged on their side.
    AddedByUs,
    /// `UD`: modified by us, deleted by them.
    DeletedByThem,
    /// `UA`: added by them.
    AddedByThem,
    /// `DU`: deleted by us, modified by them.
    DeletedByUs,
    /// `AA`: added on both sides.
    BothAdded,
    /// `UU`: modified on both sides.
    BothModified,
}

impl ConflictCode {
    /// Parse a porcelain XY code. Returns `None` for non-conflict codes.
    pub fn from_porcelain(xy: &str) -> Option<Self> {
        match xy {
            "DD" => Some(Self::BothDeleted),
            "AU" => Some(Self::AddedByUs),
            "UD" => Some(Self::DeletedByThem),
            "UA" => Some(Self::AddedByThem),
            "DU" => Some(Self::DeletedByUs),
            "AA" => Some(Self::BothAdded),
            "UU" => Some(Self::BothModified),
            _ => None,
        }
    }

    /// The raw two-letter porcelain code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BothDeleted => "DD",
            Self::AddedByUs => "AU",
            Self::DeletedByThem => "UD",
            Self::AddedByThem => "UA",
            Self::DeletedByUs => "DU",
            Self::BothAdded => "AA",
            Self::BothModified => "UU",
        }
    }

    /// Human-readable conflict type, matching git's long-format status text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BothDeleted => "both deleted",
            Self::AddedByUs => "added by us",
            Self::DeletedByThem => "deleted by them",
            Self::AddedByThem => "added by them",
            Self::DeletedByUs => "deleted by us",
            Self::BothAdded => "both added",
            Self::BothModified => "both modified",
        }
    }

    /// Suggested resolution type for a proposing agent.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::BothDeleted => "Both sides deleted - use type='delete' to confirm deletion",
            Self::AddedByUs => "Added by us - use type='add' to keep our version",
            Self::DeletedByThem => {
                "Deleted by them - use type='delete' to accept deletion, or edit and use type='resolve' to keep"
            }
            Self::AddedByThem => "Added by them - use type='add' to accept their version",
            Self::DeletedByUs => {
                "Deleted by us - use type='delete' to confirm deletion, or edit and use type='resolve' to restore"
            }
            Self::BothAdded => "Both added - edit and use type='resolve'",
            Self::BothModified => "Both modified - edit and use type='resolve'",
        }
    }
}

/// One unmerged path with its conflict code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictEntry {
    pub path: String,
    pub code: ConflictCode,
}

/// Extract the conflict entries from `git status --porcelain` output.
/// Non-conflict lines (modified, untracked, renames) are skipped.
pub fn parse_porcelain_conflicts(output: &str) -> Vec<ConflictEntry> {
    let mut entries = Vec::new();
    for line in output.lines() {
        let Some(xy) = line.get(0..2) else { continue };
        let Some(code) = ConflictCode::from_porcelain(xy) else {
            continue;
        };
        let mut path = line[2..].trim_start();
        // core.quotePath wraps unusual paths in double quotes.
        if path.len() >= 2 && path.starts_with('"') && path.ends_with('"') {
            path = &path[1..path.len() - 1];
        }
        if path.is_empty() {
            continue;
        }
        entries.push(ConflictEntry {
            path: path.to_string(),
            code,
        });
    }
    entries
}
