//! Year shards.
//!
//! A shard is the output file of a single year. [router::ShardRouter] enforces that at most one
//! shard is open at a time, and that every opened shard is either completed or flagged as aborted.
//!
//! [writer::ShardWriter] writes into a `.partial` file, renamed on completion:
//! a `{method}_{year}.txt` file is always a complete year.
pub mod router;
pub mod writer;

pub use router::ShardRouter;
pub use writer::{ShardSummary, ShardWriter};
