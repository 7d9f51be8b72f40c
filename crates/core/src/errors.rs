//! Error types for the MergeGate core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Git adapter errors
// ---------------------------------------------------------------------------

/// Errors from invoking the `git` CLI.
///
/// The git binary is treated as a black box: commands either produce text on
/// stdout or fail with a nonzero exit status, in which case the captured
/// stderr is surfaced verbatim and never retried automatically.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary was not found on `$PATH`.
    #[error("git binary not found: {0}")]
    BinaryNotFound(String),

    /// A `git` command exited with a non-zero status.
    #[error("git command failed (exit {exit_code}): {stderr}")]
    CommandFailed { exit_code: i32, stderr: String },

    /// Generic I/O wrapper (spawn failures other than ENOENT).
    #[error("git I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Resolution store errors
// ---------------------------------------------------------------------------

/// Errors from the resolution request store.
///
/// `NotFound` is always a 404-equivalent. `Delegation` is kept distinct from
/// `Adapter` so operators can tell a failed remote round trip apart from a
/// failed local git invocation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested resolution id is not pending.
    #[error("resolution not found: {0}")]
    NotFound(String),

    /// The underlying git invocation failed; the request stays pending.
    #[error("adapter error: {0}")]
    Adapter(#[from] GitError),

    /// A delegated call to the remote authority failed.
    #[error("delegation to remote store failed: {0}")]
    Delegation(String),

    /// The request shape was invalid and never reached the collection.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Filesystem error while writing reviewed content.
    #[error("store I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Delegation(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = GitError::CommandFailed {
            exit_code: 128,
            stderr: "fatal: not a git repository".into(),
        };
        assert_eq!(
            err.to_string(),
            "git command failed (exit 128): fatal: not a git repository"
        );

        let err = StoreError::NotFound("ab12cd34".into());
        assert_eq!(err.to_string(), "resolution not found: ab12cd34");

        let err = StoreError::Delegation("connection refused".into());
        assert!(err.to_string().contains("delegation"));

        let err = ConfigError::InvalidValue {
            field: "project.root".into(),
            detail: "must not be empty".into(),
        };
        assert!(err.to_string().contains("project.root"));
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let git_err = GitError::BinaryNotFound("git".into());
        let core_err: CoreError = git_err.into();
        assert!(matches!(core_err, CoreError::Git(_)));

        let store_err = StoreError::NotFound("x".into());
        let core_err: CoreError = store_err.into();
        assert!(matches!(core_err, CoreError::Store(_)));
    }

    #[test]
    fn test_adapter_error_wraps_git_error() {
        let git_err = GitError::CommandFailed {
            exit_code: 1,
            stderr: "pathspec did not match".into(),
        };
        let store_err: StoreError = git_err.into();
        assert!(matches!(store_err, StoreError::Adapter(_)));
    }
}
