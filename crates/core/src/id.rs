//! Content-addressed request identifiers.
//!
//! A resolution request's id is derived from the file path it targets, so
//! re-proposing the same file always collapses onto the same entry instead of
//! piling up duplicates. The 8-hex-char truncation keeps ids short enough to
//! quote in tool output; collisions are negligible at single-project request
//! volumes.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
const ID_LEN: usize = 8;

/// Derive the stable id for a file path.
///
/// Pure and deterministic: the same path always yields the same id.
pub fn request_id(file_path: &str) -> String {
    let digest = Sha256::digest(file_path.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(ID_LEN);
    id
}
