//! Content token filter.
use std::collections::HashSet;

use crate::config::PipelineConfig;

use super::stopwords::STOPWORDS;
use super::tagger::Token;

/// Keeps alphabetic, non-stopword tokens whose tag is allowed.
#[derive(Debug, Clone)]
pub struct TokenFilter {
    allowed_tags: HashSet<String>,
    extra_stopwords: HashSet<String>,
}

impl TokenFilter {
    pub fn new<T, S>(allowed_tags: T, extra_stopwords: S) -> Self
    where
        T: IntoIterator<Item = String>,
        S: IntoIterator<Item = String>,
    {
        Self {
            allowed_tags: allowed_tags.into_iter().collect(),
            extra_stopwords: extra_stopwords
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.allowed_tags.iter().cloned(),
            config.extra_stopwords.iter().cloned(),
        )
    }

    fn is_stopword(&self, lower: &str) -> bool {
        STOPWORDS.contains(lower) || self.extra_stopwords.contains(lower)
    }

    pub fn keep(&self, token: &Token) -> bool {
        !token.text.is_empty()
            && token.text.chars().all(char::is_alphabetic)
            && self.allowed_tags.contains(&token.tag)
            && !self.is_stopword(&token.text.to_lowercase())
    }
}

impl Default for TokenFilter {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, tag: &str) -> Token {
        Token {
            text: text.to_string(),
            lemma: text.to_lowercase(),
            tag: tag.to_string(),
        }
    }

    #[test]
    fn default_filter() {
        let f = TokenFilter::default();
        assert!(f.keep(&token("bill", "NOUN")));
        assert!(f.keep(&token("Dublin", "PROPN")));
        assert!(!f.keep(&token("The", "DET")));
        assert!(!f.keep(&token("1923", "NUM")));
        // stopword, even with an allowed tag
        assert!(!f.keep(&token("Very", "ADV")));
        assert!(!f.keep(&token("co-op", "NOUN")));
        assert!(!f.keep(&token("", "NOUN")));
    }

    #[test]
    fn configured_tags_and_stopwords() {
        let f = TokenFilter::new(
            vec!["NOUN".to_string()],
            vec!["Deputy".to_string()],
        );
        assert!(f.keep(&token("bill", "NOUN")));
        assert!(!f.keep(&token("passed", "VERB")));
        assert!(!f.keep(&token("deputy", "NOUN")));
    }
}
