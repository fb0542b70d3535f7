//! Annotator trait and batch driver.
use std::collections::VecDeque;
use std::sync::Arc;

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

use crate::config::{Annotation, Granularity, PipelineConfig};
use crate::error::Error;
use crate::identifiers::LanguageFilter;

use super::filter::TokenFilter;
use super::tagger::{TaggedSentence, Tagger};

/// The `position`-th text sent to the annotator for a year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    pub position: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub lemma: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordContent {
    Tagged(Vec<TaggedToken>),
    Text(String),
}

/// Annotation of an input (or of one of its sentences).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRecord {
    /// Position of the originating [RawInput].
    pub position: usize,
    pub content: RecordContent,
}

impl AnnotatedRecord {
    pub fn tagged(position: usize, tokens: Vec<TaggedToken>) -> Self {
        Self {
            position,
            content: RecordContent::Tagged(tokens),
        }
    }

    pub fn text(position: usize, text: String) -> Self {
        Self {
            position,
            content: RecordContent::Text(text),
        }
    }

    /// Tokens as `lemma{separator}TAG`, space separated, or the plain text as is.
    pub fn render(&self, separator: &str) -> String {
        match &self.content {
            RecordContent::Tagged(tokens) => tokens
                .iter()
                .map(|t| format!("{}{}{}", t.lemma, separator, t.tag))
                .join(" "),
            RecordContent::Text(text) => text.clone(),
        }
    }
}

/// Annotation backend.
///
/// Implementors return, for each input of a batch and in input order, the records it produced or an error.
/// Errors are scoped to a single input: other inputs of the batch are unaffected.
pub trait Annotator: Send + Sync {
    /// Method tag, used to name output folders and files (`lexicon-pos-para`).
    fn method(&self) -> String;
    fn annotate_batch(&self, batch: Vec<RawInput>) -> Vec<Result<AnnotatedRecord, Error>>;
}

fn backend_error(input: &RawInput, reason: String) -> Error {
    Error::AnnotationBackend {
        position: input.position,
        reason,
    }
}

/// Sentences of an input, minus the ones the language filter rejects.
fn kept_sentences(
    tagger: &dyn Tagger,
    language: Option<&LanguageFilter>,
    input: &RawInput,
) -> Result<Vec<TaggedSentence>, Error> {
    let sentences = tagger
        .tag(&input.text)
        .map_err(|e| backend_error(input, e.to_string()))?;

    let mut kept = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        if let Some(language) = language {
            if !language
                .keep(&sentence.text)
                .map_err(|e| backend_error(input, e.to_string()))?
            {
                debug!("input {}: dropping sentence not in {}", input.position, language.lang());
                continue;
            }
        }
        kept.push(sentence);
    }
    Ok(kept)
}

/// Tagging and filtering shared by both granularities.
struct Pipe {
    tagger: Arc<dyn Tagger>,
    filter: TokenFilter,
    language: Option<Arc<LanguageFilter>>,
}

impl Pipe {
    fn sentences(&self, input: &RawInput) -> Result<Vec<Vec<TaggedToken>>, Error> {
        let sentences = kept_sentences(self.tagger.as_ref(), self.language.as_deref(), input)?;
        Ok(sentences
            .into_iter()
            .map(|sentence| {
                sentence
                    .tokens
                    .into_iter()
                    .filter(|t| self.filter.keep(t))
                    .map(|t| TaggedToken {
                        lemma: t.lemma.to_lowercase(),
                        tag: t.tag,
                    })
                    .collect()
            })
            .collect())
    }
}

/// One record per input, in input order.
///
/// Inputs without any content token are reported as errors.
pub struct GroupedAnnotator {
    pipe: Pipe,
}

impl GroupedAnnotator {
    pub fn new(tagger: Arc<dyn Tagger>, filter: TokenFilter) -> Self {
        Self {
            pipe: Pipe {
                tagger,
                filter,
                language: None,
            },
        }
    }

    pub fn with_language_filter(mut self, language: Arc<LanguageFilter>) -> Self {
        self.pipe.language = Some(language);
        self
    }
}

impl Annotator for GroupedAnnotator {
    fn method(&self) -> String {
        format!("{}-pos-{}", self.pipe.tagger.name(), Granularity::Para)
    }

    fn annotate_batch(&self, batch: Vec<RawInput>) -> Vec<Result<AnnotatedRecord, Error>> {
        batch
            .par_iter()
            .map(|input| {
                let tokens: Vec<TaggedToken> =
                    self.pipe.sentences(input)?.into_iter().flatten().collect();
                if tokens.is_empty() {
                    return Err(backend_error(input, "no content token".to_string()));
                }
                Ok(AnnotatedRecord::tagged(input.position, tokens))
            })
            .collect()
    }
}

/// One record per sentence holding at least one content token.
///
/// An input can produce zero, one or many records, all sharing its position.
pub struct SentenceAnnotator {
    pipe: Pipe,
}

impl SentenceAnnotator {
    pub fn new(tagger: Arc<dyn Tagger>, filter: TokenFilter) -> Self {
        Self {
            pipe: Pipe {
                tagger,
                filter,
                language: None,
            },
        }
    }

    pub fn with_language_filter(mut self, language: Arc<LanguageFilter>) -> Self {
        self.pipe.language = Some(language);
        self
    }
}

impl Annotator for SentenceAnnotator {
    fn method(&self) -> String {
        format!("{}-pos-{}", self.pipe.tagger.name(), Granularity::Sent)
    }

    fn annotate_batch(&self, batch: Vec<RawInput>) -> Vec<Result<AnnotatedRecord, Error>> {
        let per_input: Vec<Result<Vec<Vec<TaggedToken>>, Error>> = batch
            .par_iter()
            .map(|input| self.pipe.sentences(input))
            .collect();

        batch
            .iter()
            .zip(per_input)
            .flat_map(|(input, sentences)| match sentences {
                Ok(sentences) => sentences
                    .into_iter()
                    .filter(|tokens| !tokens.is_empty())
                    .map(|tokens| Ok(AnnotatedRecord::tagged(input.position, tokens)))
                    .collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            })
            .collect()
    }
}

/// Plain text of the kept sentences, whitespace collapsed.
///
/// With [Granularity::Para], the sentences of an input are joined on one record,
/// and inputs left without text give no record.
pub struct TextAnnotator {
    tagger: Arc<dyn Tagger>,
    language: Option<Arc<LanguageFilter>>,
    granularity: Granularity,
}

impl TextAnnotator {
    pub fn new(tagger: Arc<dyn Tagger>, granularity: Granularity) -> Self {
        Self {
            tagger,
            language: None,
            granularity,
        }
    }

    pub fn with_language_filter(mut self, language: Arc<LanguageFilter>) -> Self {
        self.language = Some(language);
        self
    }

    fn texts(&self, input: &RawInput) -> Result<Vec<String>, Error> {
        let sentences = kept_sentences(self.tagger.as_ref(), self.language.as_deref(), input)?;
        Ok(sentences
            .iter()
            .map(|s| s.text.split_whitespace().join(" "))
            .filter(|t| !t.is_empty())
            .collect())
    }
}

impl Annotator for TextAnnotator {
    /// `{lang}-text-{granularity}`, `all` standing for the language when nothing is filtered.
    fn method(&self) -> String {
        let lang = self.language.as_ref().map_or("all", |l| l.lang());
        format!("{}-text-{}", lang, self.granularity)
    }

    fn annotate_batch(&self, batch: Vec<RawInput>) -> Vec<Result<AnnotatedRecord, Error>> {
        let per_input: Vec<Result<Vec<String>, Error>> =
            batch.par_iter().map(|input| self.texts(input)).collect();

        batch
            .iter()
            .zip(per_input)
            .flat_map(|(input, texts)| match (texts, self.granularity) {
                (Ok(texts), _) if texts.is_empty() => vec![],
                (Ok(texts), Granularity::Para) => {
                    vec![Ok(AnnotatedRecord::text(input.position, texts.join(" ")))]
                }
                (Ok(texts), Granularity::Sent) => texts
                    .into_iter()
                    .map(|text| Ok(AnnotatedRecord::text(input.position, text)))
                    .collect(),
                (Err(e), _) => vec![Err(e)],
            })
            .collect()
    }
}

/// Build the annotator matching the configured annotation and granularity.
pub fn build_annotator(
    tagger: Arc<dyn Tagger>,
    config: &PipelineConfig,
    language: Option<Arc<LanguageFilter>>,
) -> Box<dyn Annotator> {
    if config.annotation == Annotation::Text {
        let annotator = TextAnnotator::new(tagger, config.granularity);
        return match language {
            Some(l) => Box::new(annotator.with_language_filter(l)),
            None => Box::new(annotator),
        };
    }

    let filter = TokenFilter::from_config(config);
    match (config.granularity, language) {
        (Granularity::Para, None) => Box::new(GroupedAnnotator::new(tagger, filter)),
        (Granularity::Para, Some(l)) => {
            Box::new(GroupedAnnotator::new(tagger, filter).with_language_filter(l))
        }
        (Granularity::Sent, None) => Box::new(SentenceAnnotator::new(tagger, filter)),
        (Granularity::Sent, Some(l)) => {
            Box::new(SentenceAnnotator::new(tagger, filter).with_language_filter(l))
        }
    }
}

/// Lazy annotation of an input stream.
///
/// Pulls `batch_size` inputs at a time from the inner iterator,
/// and yields the results of a batch before pulling the next one.
pub struct Annotated<'a, I> {
    annotator: &'a dyn Annotator,
    inputs: I,
    batch_size: usize,
    pending: VecDeque<Result<AnnotatedRecord, Error>>,
    consumed: usize,
}

impl<'a, I> Annotated<'a, I> {
    /// Number of inputs pulled so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

pub fn annotate<I>(annotator: &dyn Annotator, inputs: I, batch_size: usize) -> Annotated<'_, I::IntoIter>
where
    I: IntoIterator<Item = RawInput>,
{
    Annotated {
        annotator,
        inputs: inputs.into_iter(),
        batch_size: batch_size.max(1),
        pending: VecDeque::new(),
        consumed: 0,
    }
}

impl<'a, I: Iterator<Item = RawInput>> Iterator for Annotated<'a, I> {
    type Item = Result<AnnotatedRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        // loop since a batch can produce no record at all
        while self.pending.is_empty() {
            let batch: Vec<RawInput> = self.inputs.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                return None;
            }
            self.consumed += batch.len();
            self.pending.extend(self.annotator.annotate_batch(batch));
        }
        self.pending.pop_front()
    }
}
