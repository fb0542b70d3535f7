/*! Identifier trait

Language identifiers implement [Identifier] to be useable as a sentence filter during annotation.
!*/
use fasttext::Prediction;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    label: String,
    prob: f32,
}

impl Identification {
    pub fn new(label: String, prob: f32) -> Self {
        Self { label, prob }
    }

    /// Get a reference to the identification's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get a reference to the identification's prob.
    pub fn prob(&self) -> &f32 {
        &self.prob
    }
}

/// Strips the `__label__` prefix of fasttext predictions.
impl From<Prediction> for Identification {
    fn from(prediction: Prediction) -> Self {
        let label = prediction
            .label
            .strip_prefix("__label__")
            .unwrap_or(&prediction.label)
            .to_string();
        Self {
            label,
            prob: prediction.prob,
        }
    }
}

pub trait Identifier: Send + Sync {
    /// Returns [None] when no identification is reliable enough.
    fn identify(&self, sentence: &str) -> Result<Option<Identification>, Error>;
}

/// Keeps sentences identified as a given language.
pub struct LanguageFilter {
    identifier: Box<dyn Identifier>,
    lang: String,
}

impl LanguageFilter {
    pub fn new(identifier: Box<dyn Identifier>, lang: &str) -> Self {
        Self {
            identifier,
            lang: lang.to_string(),
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Unidentified sentences are dropped.
    pub fn keep(&self, sentence: &str) -> Result<bool, Error> {
        // fasttext predicts on a single line
        let line = sentence.replace(['\n', '\r'], " ");
        Ok(self
            .identifier
            .identify(&line)?
            .map(|id| id.label() == self.lang)
            .unwrap_or(false))
    }
}
