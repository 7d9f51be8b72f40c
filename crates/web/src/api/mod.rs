//! REST API endpoint modules.

pub mod resolutions;
pub mod status;
