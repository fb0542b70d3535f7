//! Pipelines.
//!
//! The module provides a light [pipeline::Pipeline] trait,
//! and the [tagging::TaggingPipeline] that produces the tagged year shards.
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod report;
pub mod tagging;

pub use pipeline::Pipeline;
pub use report::{RunReport, YearReport, YearStatus};
pub use tagging::TaggingPipeline;
