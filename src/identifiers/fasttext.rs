//! Fasttext identifier
use std::path::Path;

use fasttext::FastText as FastTextLib;

use crate::error::Error;

use super::{Identification, Identifier};

/// Holds a [fasttext::FastText] instance and its parameters:
/// - [FastText::k], number of predicted languages on a sentence
/// - [FastText::threshold], prediction threshold
pub struct FastText {
    predictor: FastTextLib,
    pub k: i32,
    pub threshold: f32,
}

impl FastText {
    /// Create a new fasttext classifier.
    ///
    /// filename has to be a path to a `bin` file.
    pub fn new(filename: &Path, k: i32, threshold: f32) -> Result<Self, Error> {
        let mut predictor = FastTextLib::new();
        let filename = filename
            .to_str()
            .ok_or_else(|| Error::Custom(format!("invalid filepath for lid: {:?}", filename)))?;
        predictor.load_model(filename).map_err(Error::FastText)?;
        Ok(Self {
            predictor,
            k,
            threshold,
        })
    }
}

impl Identifier for FastText {
    fn identify(&self, sentence: &str) -> Result<Option<Identification>, Error> {
        // null chars make fasttext fail
        let sentence = sentence.replace(char::from(0), "");
        let predictions = self
            .predictor
            .predict(&sentence, self.k, self.threshold)
            .map_err(Error::FastText)?;
        Ok(predictions.into_iter().next().map(Identification::from))
    }
}
