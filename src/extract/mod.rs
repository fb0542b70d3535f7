/*! Paragraph extraction.

Transcripts are Akoma Ntoso `debateRecord` documents.
For each sitting we read the date declared in `FRBRWork/FRBRdate`,
then every `p` element directly under a `speech` element becomes a [Paragraph].

Paragraphs are yielded lazily, one transcript being parsed at a time, in archive order then document order.
!*/
mod document;
mod extractor;
mod normalize;
mod uri;

pub use document::{Paragraph, SourceDocument};
pub use extractor::{ExtractedParagraph, ExtractionStats, ParagraphExtractor};
pub use normalize::Normalizer;
pub use uri::{SourceUri, UriPolicy};
