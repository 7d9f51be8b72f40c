//! Tool implementations.

pub mod conflicts;
pub mod review;

#[cfg(test)]
pub(crate) mod test_support;

/// Page size shared by every paginated tool.
pub(crate) const PAGE_SIZE: usize = 20;

/// Normalize a 1-based page argument.
pub(crate) fn page_number(raw: Option<u64>) -> usize {
    raw.map(|p| p.max(1) as usize).unwrap_or(1)
}

/// Pretty-print a serializable value for a tool response body.
pub(crate) fn pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| String::from("{}"))
}
