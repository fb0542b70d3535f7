/*! Part-of-speech annotation.

Annotation is split into two layers:

- a [Tagger] is the NLP capability: it segments a text into sentences and gives each token a lemma and a coarse tag.
  [LexiconTagger] is the built-in backend.
- an [Annotator] turns batches of [RawInput] into [AnnotatedRecord]s, keeping content tokens only.
  [GroupedAnnotator] emits one record per input, [SentenceAnnotator] one record per sentence,
  and [TextAnnotator] keeps the plain text of the sentences instead of tagged lemmas.

Annotators never track URIs: every record carries the position of the input it comes from,
and [crate::align::UriIndex] maps it back to its paragraph.
!*/
mod annotator;
mod filter;
mod lexicon;
mod stopwords;
mod tagger;

pub use annotator::{
    annotate, build_annotator, Annotated, AnnotatedRecord, Annotator, GroupedAnnotator,
    RawInput, RecordContent, SentenceAnnotator, TaggedToken, TextAnnotator,
};
pub use filter::TokenFilter;
pub use lexicon::LexiconTagger;
pub use stopwords::STOPWORDS;
pub use tagger::{TaggedSentence, Tagger, Token};
