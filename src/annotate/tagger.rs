//! Tagger trait.
use crate::error::Error;

/// A tagged token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    /// Coarse (universal) part-of-speech tag, such as `NOUN` or `VERB`.
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSentence {
    pub text: String,
    pub tokens: Vec<Token>,
}

/// NLP backend: sentence segmentation, tokenization, lemmatization and tagging.
///
/// Taggers are shared between year workers, so they must not hold per-call state.
pub trait Tagger: Send + Sync {
    /// Short backend name, used in output file names.
    fn name(&self) -> &'static str;
    fn tag(&self, text: &str) -> Result<Vec<TaggedSentence>, Error>;
}
