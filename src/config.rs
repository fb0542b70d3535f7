//! Pipeline configuration.
//!
//! Every field has a default, so a configuration file only needs to hold the
//! values that differ. Command line flags are applied on top of it.
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Unit that gets annotated and written as one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Para,
    Sent,
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "para" | "paragraph" => Ok(Granularity::Para),
            "sent" | "sentence" => Ok(Granularity::Sent),
            other => Err(Error::Custom(format!(
                "unknown granularity {other:?} (expected para or sent)"
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Para => write!(f, "para"),
            Granularity::Sent => write!(f, "sent"),
        }
    }
}

/// What a line holds: tagged content lemmas, or the plain text of the kept sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Annotation {
    #[default]
    Pos,
    Text,
}

impl FromStr for Annotation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pos" => Ok(Annotation::Pos),
            "text" => Ok(Annotation::Text),
            other => Err(Error::Custom(format!(
                "unknown annotation {other:?} (expected pos or text)"
            ))),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Pos => write!(f, "pos"),
            Annotation::Text => write!(f, "text"),
        }
    }
}

/// Sentence-level language filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageFilterConfig {
    /// Path to a fasttext language identification model.
    pub model: PathBuf,
    /// Language to keep, as predicted by the model (`en`, `ga`...).
    pub lang: String,
    #[serde(default = "default_lid_threshold")]
    pub threshold: f32,
}

fn default_lid_threshold() -> f32 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Archive members not starting with this prefix are ignored.
    pub entry_prefix: String,
    /// Regex capturing year, month and day in a member name.
    pub date_pattern: String,
    /// Prefixes removed from paragraph identifiers when building URIs.
    pub uri_strip_prefixes: Vec<String>,
    /// Coarse tags kept in the output.
    pub allowed_tags: Vec<String>,
    /// Words dropped on top of the built-in english stopword list.
    pub extra_stopwords: Vec<String>,
    /// Separator between lemma and tag in the output.
    pub token_separator: String,
    /// Literal replacements applied to paragraph text before annotation.
    pub replacements: Vec<(String, String)>,
    /// Repair mis-decoded windows-1252 punctuation.
    pub normalize: bool,
    /// Send empty paragraphs to the annotator instead of dropping them.
    pub keep_empty: bool,
    pub batch_size: usize,
    /// Number of disjoint year ranges processed concurrently.
    pub workers: usize,
    pub granularity: Granularity,
    pub annotation: Annotation,
    /// Optional TSV lexicon (`word\tlemma\tTAG`) for the default tagger.
    pub lexicon: Option<PathBuf>,
    pub language_filter: Option<LanguageFilterConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            entry_prefix: "dail/AK-dail".to_string(),
            date_pattern: r"-(\d{4})-(\d{2})-(\d{2})\.xml$".to_string(),
            uri_strip_prefixes: vec!["para_".to_string()],
            allowed_tags: ["ADV", "ADJ", "VERB", "PROPN", "NOUN"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            extra_stopwords: Vec::new(),
            token_separator: "/".to_string(),
            replacements: vec![("co-op".to_string(), "coop".to_string())],
            normalize: true,
            keep_empty: false,
            batch_size: 100,
            workers: 1,
            granularity: Granularity::Para,
            annotation: Annotation::Pos,
            lexicon: None,
            language_filter: None,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let f = std::fs::File::open(path)?;
        let config: PipelineConfig = serde_json::from_reader(std::io::BufReader::new(f))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.batch_size == 0 {
            return Err(Error::Custom("batch_size must be at least 1".to_string()));
        }
        if self.workers == 0 {
            return Err(Error::Custom("workers must be at least 1".to_string()));
        }
        if self.allowed_tags.is_empty() {
            return Err(Error::Custom("allowed_tags cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"granularity": "sent", "token_separator": "_"}"#).unwrap();

        assert_eq!(config.granularity, Granularity::Sent);
        assert_eq!(config.token_separator, "_");
        assert_eq!(config.entry_prefix, "dail/AK-dail");
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.annotation, Annotation::Pos);
    }

    #[test]
    fn text_annotation() {
        let config: PipelineConfig = serde_json::from_str(r#"{"annotation": "text"}"#).unwrap();
        assert_eq!(config.annotation, Annotation::Text);
        assert_eq!("pos".parse::<Annotation>().unwrap(), Annotation::Pos);
        assert!("ner".parse::<Annotation>().is_err());
    }

    #[test]
    fn from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"workers": 4, "allowed_tags": ["NOUN"]}"#).unwrap();

        let config = PipelineConfig::from_path(&path).unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.allowed_tags, vec!["NOUN".to_string()]);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = PipelineConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn granularity_from_str() {
        assert_eq!("para".parse::<Granularity>().unwrap(), Granularity::Para);
        assert_eq!("sentence".parse::<Granularity>().unwrap(), Granularity::Sent);
        assert!("word".parse::<Granularity>().is_err());
    }
}
