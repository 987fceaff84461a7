//! CLI library components for the enrollment report generator.

pub mod logging;
pub mod pipeline;
pub mod types;
