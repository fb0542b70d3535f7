/*! Language identification

Holds an [Identifier] trait for implementing other ones, and a [LanguageFilter] built on it
that drops sentences of other languages before annotation.

The current identifier used is [fasttext](https://fasttext.cc) !*/
mod fasttext;
mod identifier;

pub use self::fasttext::FastText;
pub use identifier::{Identification, Identifier, LanguageFilter};

#[cfg(test)]
pub(crate) use identifier::tests::KeywordIdentifier;
