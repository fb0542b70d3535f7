//! Annotation pipeline.
//!
//! Turns an archive of sitting transcripts into one shard per year, holding either tagged content
//! lemmas or the plain text of the kept sentences.
//!
//! # Processing
//! 1. Sittings are indexed by year from their file names.
//! 1. The year range is split into disjoint sub-ranges, each processed by one worker
//!    with its own archive handle and its own [ShardRouter].
//! 1. For each year, paragraphs are extracted and repaired, empty ones are dropped,
//!    and the remaining ones get a position in the year's [UriIndex].
//! 1. Inputs are annotated lazily, in batches. Inputs the annotator cannot process are skipped.
//! 1. Each record is resolved to the URI of its paragraph and written to the year shard.
//!    A record that cannot be resolved aborts the year.
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::align::UriIndex;
use crate::annotate::{annotate, build_annotator, Annotator, LexiconTagger, RawInput, Tagger};
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::extract::{Normalizer, ParagraphExtractor, UriPolicy};
use crate::identifiers::{FastText, LanguageFilter};
use crate::shard::ShardRouter;
use crate::sources::{Archive, EntryPattern, SourceIndex, SourceRef, YearRange};

use super::pipeline::Pipeline;
use super::report::{RunReport, YearReport, YearStatus};

pub struct TaggingPipeline {
    src: PathBuf,
    dst: PathBuf,
    range: YearRange,
    config: PipelineConfig,
    pattern: EntryPattern,
    policy: UriPolicy,
    normalizer: Normalizer,
    annotator: Box<dyn Annotator>,
}

impl TaggingPipeline {
    pub fn new(
        src: PathBuf,
        dst: PathBuf,
        range: YearRange,
        config: PipelineConfig,
        annotator: Box<dyn Annotator>,
    ) -> Result<Self, Error> {
        config.validate()?;
        let pattern = EntryPattern::from_config(&config)?;
        let policy = UriPolicy::new(config.uri_strip_prefixes.clone());
        let normalizer = Normalizer::from_config(&config);

        debug!("pipeline config: {:#?}", config);
        Ok(Self {
            src,
            dst,
            range,
            config,
            pattern,
            policy,
            normalizer,
            annotator,
        })
    }

    /// Build the default annotator (lexicon tagger, optional fasttext language filter) from the configuration.
    pub fn from_config(
        src: PathBuf,
        dst: PathBuf,
        range: YearRange,
        config: PipelineConfig,
    ) -> Result<Self, Error> {
        let tagger: Arc<dyn Tagger> = match &config.lexicon {
            Some(path) => Arc::new(LexiconTagger::from_path(path)?),
            None => Arc::new(LexiconTagger::default()),
        };

        let language = match &config.language_filter {
            Some(lf) => {
                info!("keeping {} sentences only (model {:?})", lf.lang, lf.model);
                let identifier = FastText::new(&lf.model, 1, lf.threshold)?;
                Some(Arc::new(LanguageFilter::new(Box::new(identifier), &lf.lang)))
            }
            None => None,
        };

        let annotator = build_annotator(tagger, &config, language);
        Self::new(src, dst, range, config, annotator)
    }

    pub fn method(&self) -> String {
        self.annotator.method()
    }

    /// `{dst}/{method}_{start}-{end}`
    pub fn output_dir(&self) -> PathBuf {
        self.dst.join(format!(
            "{}_{}-{}",
            self.method(),
            self.range.start(),
            self.range.end()
        ))
    }

    /// Process a sub-range of years with a dedicated archive handle and router.
    fn process_range(&self, range: YearRange, index: &SourceIndex, out: &Path) -> Vec<YearReport> {
        let mut archive = match Archive::from_path(&self.src) {
            Ok(archive) => archive,
            Err(e) => {
                return range
                    .years()
                    .map(|year| YearReport::aborted(year, index.get(year).len(), &e))
                    .collect()
            }
        };

        let mut router = ShardRouter::new(out, &self.method());
        range
            .years()
            .map(|year| self.process_year(&mut archive, &mut router, year, index.get(year)))
            .collect()
    }

    /// Extract, annotate and write a year.
    pub fn process_year<R: Read + Seek>(
        &self,
        archive: &mut Archive<R>,
        router: &mut ShardRouter,
        year: i32,
        sittings: &[SourceRef],
    ) -> YearReport {
        info!("{}: {} sittings", year, sittings.len());
        let mut report = YearReport::new(year, sittings.len());

        // materialize the year's inputs along with their URIs,
        // so that every position is known before annotation starts.
        let mut uris = UriIndex::new();
        let mut inputs = Vec::new();
        let mut extractor = ParagraphExtractor::new(archive, sittings, &self.policy);
        for paragraph in extractor.by_ref() {
            let text = self.normalizer.normalize(&paragraph.text);
            if text.trim().is_empty() && !self.config.keep_empty {
                report.empty_paragraphs += 1;
                continue;
            }
            let position = uris.push(paragraph.uri);
            inputs.push(RawInput { position, text });
        }

        let stats = extractor.stats();
        report.documents = stats.documents;
        report.skipped_documents = stats.skipped_documents;
        report.paragraphs = stats.paragraphs;
        report.inputs = inputs.len();

        let mut records = 0;
        let mut skipped = 0;
        let separator = self.config.token_separator.as_str();
        let lines = annotate(self.annotator.as_ref(), inputs, self.config.batch_size).filter_map(
            |result| match result {
                Ok(record) => {
                    records += 1;
                    Some(uris.resolve(&record, separator))
                }
                Err(e) if !e.is_fatal() => {
                    warn!("{}: skipping input: {}", year, e);
                    skipped += 1;
                    None
                }
                Err(e) => Some(Err(e)),
            },
        );

        let result = router.route_year(year, lines);
        report.records = records;
        report.skipped_inputs = skipped;

        match result {
            Ok(summary) => report.lines_written = summary.lines,
            Err(e) => {
                report.status = YearStatus::Aborted {
                    reason: e.to_string(),
                }
            }
        }
        report
    }
}

impl Pipeline<RunReport> for TaggingPipeline {
    fn run(&self) -> Result<RunReport, Error> {
        let out = self.output_dir();
        if !out.exists() {
            info!("creating {:?}", out);
            std::fs::create_dir_all(&out)?;
        }

        let index = {
            let mut archive = Archive::from_path(&self.src)?;
            SourceIndex::build(&mut archive, self.range, &self.pattern)?
        };
        info!(
            "{} sittings between {} and {}",
            index.nb_documents(),
            self.range.start(),
            self.range.end()
        );

        let ranges = self.range.split(self.config.workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ranges.len())
            .build()
            .map_err(|e| Error::Custom(format!("could not build thread pool: {e}")))?;

        let mut years: Vec<YearReport> = pool.install(|| {
            ranges
                .par_iter()
                .flat_map_iter(|range| self.process_range(*range, &index, &out))
                .collect()
        });
        years.sort_by_key(|y| y.year);

        let report = RunReport {
            method: self.method(),
            start_year: self.range.start(),
            end_year: self.range.end(),
            skipped_entries: index.skipped(),
            years,
        };
        report.log();
        report.write(&out.join("report.json"))?;
        Ok(report)
    }
}
