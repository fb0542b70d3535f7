//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use dail_corpus::config::{Annotation, Granularity, LanguageFilterConfig, PipelineConfig};
use dail_corpus::error::Error;

#[derive(Debug, StructOpt)]
#[structopt(name = "dail-corpus", about = "debate transcript tagging tool.")]
/// Holds every command that is callable by the `dail-corpus` command.
pub enum DailCorpus {
    #[structopt(about = "Tag a range of years of an archive, one shard per year")]
    Tag(Tag),
    #[structopt(about = "Line, token and vocabulary counts of tagged shards, per period")]
    Stats(Stats),
    #[structopt(about = "Compress tagged shards")]
    Compress(Compress),
    #[structopt(about = "Compute checksums of tagged shards")]
    Package(Package),
}

#[derive(Debug, StructOpt)]
/// Tagging command and parameters.
///
/// ```sh
/// dail-corpus-tag 0.1.0
/// Tag a range of years of an archive, one shard per year
///
/// USAGE:
///     dail-corpus tag [OPTIONS] <start> <end> <archive> <dst>
///
/// OPTIONS:
///     -a, --annotation <annotation>    tagged content lemmas (pos) or plain sentence text (text)
///     -g, --granularity <granularity>  one line per paragraph (para) or per sentence (sent)
///
/// ARGS:
///     <start>      first year (included)
///     <end>        last year (included)
///     <archive>    zip archive of sitting transcripts
///     <dst>        output location
/// ```
pub struct Tag {
    #[structopt(help = "first year (included)")]
    pub start: i32,
    #[structopt(help = "last year (included)")]
    pub end: i32,
    #[structopt(parse(from_os_str), help = "zip archive of sitting transcripts")]
    pub archive: PathBuf,
    #[structopt(parse(from_os_str), help = "output location")]
    pub dst: PathBuf,
    #[structopt(
        short = "g",
        long = "granularity",
        help = "one line per paragraph (para) or per sentence (sent)"
    )]
    pub granularity: Option<Granularity>,
    #[structopt(
        short = "a",
        long = "annotation",
        help = "tagged content lemmas (pos) or plain sentence text (text)"
    )]
    pub annotation: Option<Annotation>,
    #[structopt(parse(from_os_str), short = "c", long = "config", help = "JSON configuration file")]
    pub config: Option<PathBuf>,
    #[structopt(
        parse(from_os_str),
        long = "lexicon",
        help = "tab separated word, lemma, tag lexicon"
    )]
    pub lexicon: Option<PathBuf>,
    #[structopt(
        parse(from_os_str),
        long = "lid-path",
        help = "Path to a fasttext language identification model (lid.176.bin). Enables sentence language filtering."
    )]
    pub lid_path: Option<PathBuf>,
    #[structopt(long = "lang", default_value = "en", help = "language to keep when filtering")]
    pub lang: String,
    #[structopt(short = "w", long = "workers", help = "number of concurrent year ranges")]
    pub workers: Option<usize>,
    #[structopt(short = "b", long = "batch-size", help = "inputs per annotation batch")]
    pub batch_size: Option<usize>,
}

impl Tag {
    /// Configuration file (or defaults), overridden by command line options.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, Error> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_path(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(granularity) = self.granularity {
            config.granularity = granularity;
        }
        if let Some(annotation) = self.annotation {
            config.annotation = annotation;
        }
        if let Some(lexicon) = &self.lexicon {
            config.lexicon = Some(lexicon.clone());
        }
        if let Some(model) = &self.lid_path {
            let threshold = config
                .language_filter
                .as_ref()
                .map(|lf| lf.threshold)
                .unwrap_or(0.5);
            config.language_filter = Some(LanguageFilterConfig {
                model: model.clone(),
                lang: self.lang.clone(),
                threshold,
            });
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, StructOpt)]
pub struct Stats {
    #[structopt(parse(from_os_str), help = "tagged shards location")]
    pub src: PathBuf,
    #[structopt(help = "first year (included)")]
    pub start: i32,
    #[structopt(help = "end year (excluded)")]
    pub end: i32,
    #[structopt(
        short = "i",
        long = "interval",
        default_value = "1",
        help = "number of years per period"
    )]
    pub interval: i32,
}

#[derive(Debug, StructOpt)]
pub struct Compress {
    #[structopt(parse(from_os_str), help = "tagged shards location")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "compressed shards location")]
    pub dst: PathBuf,
}

#[derive(Debug, StructOpt)]
#[structopt(about = "Compute a sha384sum for each shard, in a `sha384sum -c`-able file.")]
pub struct Package {
    #[structopt(parse(from_os_str), help = "shards location (plain or compressed)")]
    pub src: PathBuf,
}
