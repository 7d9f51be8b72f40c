//! Read-only conflict overview.
//!
//! A transport can expose this as a browsable resource next to the tools: a
//! map of conflict ids to file, porcelain status and a suggested resolution
//! type, so an agent can plan before spending rate-limited tool calls. Ids
//! match what `list_conflicts` assigns.

use std::path::Path;

use mergegate_core::errors::GitError;
use mergegate_core::git::ConflictSource;

/// Build the conflict overview for `root` as a JSON object keyed by
/// 1-based conflict id.
pub async fn conflict_list(
    source: &dyn ConflictSource,
    root: &Path,
) -> Result<serde_json::Value, GitError> {
    let entries = source.conflicted_with_status(root).await?;

    let mut map = serde_json::Map::new();
    for (index, entry) in entries.iter().enumerate() {
        map.insert(
            (index + 1).to_string(),
            serde_json::json!({
                "file": entry.path,
                "conflictType": entry.code.label(),
                "suggestion": entry.code.suggestion(),
            }),
        );
    }

    Ok(serde_json::Value::Object(map))
}
