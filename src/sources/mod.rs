//! Transcript archive access.
//!
//! [archive::Archive] wraps a zip archive and gives access to its members in archive order,
//! [index::SourceIndex] groups transcript members by sitting year.
pub mod archive;
pub mod index;

pub use archive::Archive;
pub use index::{EntryPattern, SourceIndex, SourceRef, YearRange};
