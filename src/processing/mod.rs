//! Post-processing of tagged shards: reading back, compression and packaging.
pub mod compress;
pub mod corpus;
pub mod package;

pub use compress::compress_corpus;
pub use corpus::{periods, CorpusReader, PeriodStats};
pub use package::package;
