//! # dail-corpus
//!
//! Turns an archive of parliamentary debate transcripts into part-of-speech tagged corpora,
//! one file per year, each line prefixed by the URI of the paragraph it comes from.
//!
//! ## Getting started
//!
//! ```sh
//! dail-corpus 0.1.0
//! debate transcript tagging tool.
//!
//! USAGE:
//!     dail-corpus <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     compress    Compress tagged shards
//!     help        Prints this message or the help of the given subcommand(s)
//!     package     Compute checksums of tagged shards
//!     stats       Line, token and vocabulary counts of tagged shards, per period
//!     tag         Tag a range of years of an archive, one shard per year
//! ```
//!
//! Logging is configured through `RUST_LOG` (`RUST_LOG=info dail-corpus tag ...`).
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

use dail_corpus::error::Error;
use dail_corpus::pipelines::{Pipeline, TaggingPipeline};
use dail_corpus::processing::{compress_corpus, package, CorpusReader};
use dail_corpus::sources::YearRange;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::DailCorpus::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::DailCorpus::Tag(t) => {
            let config = t.pipeline_config()?;
            let range = YearRange::new(t.start, t.end)?;
            let p = TaggingPipeline::from_config(t.archive, t.dst, range, config)?;
            let report = p.run()?;
            if !report.is_success() {
                return Err(Error::Custom(format!(
                    "aborted years: {:?} (see report.json in {:?})",
                    report.aborted_years(),
                    p.output_dir()
                )));
            }
        }
        cli::DailCorpus::Stats(s) => {
            let reader = CorpusReader::new(&s.src)?;
            let stats = reader.stats(s.start, s.end, s.interval)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        cli::DailCorpus::Compress(c) => {
            let compressed = compress_corpus(&c.src, &c.dst)?;
            info!("compressed {} shards", compressed.len());
        }
        cli::DailCorpus::Package(p) => {
            let path = package(&p.src)?;
            info!("checksums written to {:?}", path);
        }
    };
    Ok(())
}
