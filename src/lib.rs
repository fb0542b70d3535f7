pub mod align;
pub mod annotate;
pub mod config;
pub mod error;
pub mod extract;
pub mod identifiers;
pub mod pipelines;
pub mod processing;
pub mod shard;
pub mod sources;
