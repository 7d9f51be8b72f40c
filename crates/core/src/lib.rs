//! MergeGate core library.
//!
//! This crate provides the foundational components for human-gated merge
//! conflict resolution: configuration, the git adapter, conflict rendering,
//! the resolution request store (local and delegated), request identifiers,
//! and rate limiting.

pub mod config;
pub mod context;
pub mod errors;
pub mod git;
pub mod id;
pub mod models;
pub mod ratelimit;
pub mod render;
pub mod store;

// Re-exports for convenience.
pub use config::AppConfig;
pub use context::ProjectContext;
pub use errors::CoreError;
pub use git::{ConflictSource, GitCli};
pub use models::{NewResolution, RequestState, ResolutionKind, ResolutionRequest};
pub use ratelimit::RateLimiter;
pub use store::{LocalStore, RemoteStore, ResolutionStore};
