//! Lexicon and suffix based tagger.
//!
//! A baseline backend: words found in the lexicon get its lemma and tag,
//! closed-class words get their fixed tag, and the rest is guessed from
//! capitalization and suffixes.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;

use super::tagger::{TaggedSentence, Tagger, Token};

lazy_static! {
    static ref CLOSED_CLASS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        for w in ["the", "a", "an", "this", "that", "these", "those", "every", "each", "some",
            "any", "no", "all", "both", "either", "neither"] {
            m.insert(w, "DET");
        }
        for w in ["i", "me", "you", "he", "him", "she", "her", "it", "we", "us", "they",
            "them", "my", "your", "his", "its", "our", "their", "who", "whom", "which", "what",
            "myself", "himself", "herself", "itself", "ourselves", "themselves"] {
            m.insert(w, "PRON");
        }
        for w in ["of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "upon",
            "about", "against", "between", "through", "during", "before", "after", "above",
            "below", "under", "over", "without", "within"] {
            m.insert(w, "ADP");
        }
        for w in ["and", "or", "but", "nor"] {
            m.insert(w, "CCONJ");
        }
        for w in ["if", "because", "although", "though", "while", "whether", "unless",
            "since", "than"] {
            m.insert(w, "SCONJ");
        }
        for w in ["is", "are", "was", "were", "be", "been", "being", "am", "have", "has",
            "had", "do", "does", "did", "will", "would", "shall", "should", "can", "could",
            "may", "might", "must"] {
            m.insert(w, "AUX");
        }
        for w in ["not", "very", "too", "also", "so", "then", "now", "here", "there"] {
            m.insert(w, "ADV");
        }
        m
    };
}

const ADJ_SUFFIXES: [&str; 10] = [
    "ous", "ful", "able", "ible", "ive", "al", "ic", "less", "ish", "ary",
];

/// Strip a doubled final consonant left by suffix removal (`stopp` -> `stop`).
fn undouble(stem: &str) -> String {
    let mut chars = stem.char_indices().rev();
    match (chars.next(), chars.next(), chars.next()) {
        (Some((last_idx, last)), Some((_, before)), Some(_))
            if last == before
                && last.is_ascii_alphabetic()
                && !matches!(last, 's' | 'l' | 'f' | 'z' | 'a' | 'e' | 'i' | 'o' | 'u') =>
        {
            stem[..last_idx].to_string()
        }
        _ => stem.to_string(),
    }
}

fn guess_lemma(lower: &str, tag: &str) -> String {
    match tag {
        "VERB" => {
            if let Some(stem) = lower.strip_suffix("ied") {
                format!("{stem}y")
            } else if let Some(stem) = lower.strip_suffix("ed").filter(|s| s.len() > 2) {
                undouble(stem)
            } else if let Some(stem) = lower.strip_suffix("ing").filter(|s| s.len() > 2) {
                undouble(stem)
            } else {
                lower.to_string()
            }
        }
        "NOUN" => {
            if let Some(stem) = lower.strip_suffix("ies").filter(|s| s.len() > 1) {
                format!("{stem}y")
            } else if lower.ends_with("ss") || lower.ends_with("us") || lower.len() <= 3 {
                lower.to_string()
            } else if let Some(stem) = lower.strip_suffix('s') {
                stem.to_string()
            } else {
                lower.to_string()
            }
        }
        _ => lower.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    lexicon: HashMap<String, (String, String)>,
}

impl LexiconTagger {
    pub fn new(lexicon: HashMap<String, (String, String)>) -> Self {
        Self { lexicon }
    }

    /// Load a lexicon from a TSV file (`word\tlemma\tTAG`).
    ///
    /// Malformed lines are skipped. Words are matched lowercased.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let f = BufReader::new(File::open(path)?);
        let mut lexicon = HashMap::new();
        for (idx, line) in f.lines().enumerate() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            match fields.as_slice() {
                [word, lemma, tag] => {
                    lexicon.insert(
                        word.to_lowercase(),
                        (lemma.to_string(), tag.trim().to_uppercase()),
                    );
                }
                _ => warn!("{:?}:{}: expected 3 fields, skipping", path, idx + 1),
            }
        }
        debug!("loaded {} lexicon entries from {:?}", lexicon.len(), path);
        Ok(Self { lexicon })
    }

    fn tag_word(&self, word: &str, sentence_initial: bool) -> Token {
        let lower = word.to_lowercase();

        if let Some((lemma, tag)) = self.lexicon.get(&lower) {
            return Token {
                text: word.to_string(),
                lemma: lemma.clone(),
                tag: tag.clone(),
            };
        }

        let tag = if word.chars().all(|c| c.is_numeric()) {
            "NUM"
        } else if !word.chars().all(char::is_alphabetic) {
            "X"
        } else if let Some(tag) = CLOSED_CLASS.get(lower.as_str()) {
            *tag
        } else if !sentence_initial && word.chars().next().map_or(false, char::is_uppercase) {
            "PROPN"
        } else if lower.ends_with("ly") && lower.len() > 4 {
            "ADV"
        } else if (lower.ends_with("ed") || lower.ends_with("ing")) && lower.len() > 4 {
            "VERB"
        } else if ADJ_SUFFIXES
            .iter()
            .any(|s| lower.ends_with(s) && lower.len() > s.len() + 2)
        {
            "ADJ"
        } else {
            "NOUN"
        };

        let lemma = if tag == "PROPN" {
            word.to_string()
        } else {
            guess_lemma(&lower, tag)
        };

        Token {
            text: word.to_string(),
            lemma,
            tag: tag.to_string(),
        }
    }
}

impl Tagger for LexiconTagger {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn tag(&self, text: &str) -> Result<Vec<TaggedSentence>, Error> {
        if text.contains(char::REPLACEMENT_CHARACTER) {
            return Err(Error::Tagging("text is not valid utf-8".to_string()));
        }

        let sentences = text
            .unicode_sentences()
            .map(|sentence| {
                let tokens = sentence
                    .unicode_words()
                    .enumerate()
                    .map(|(idx, word)| self.tag_word(word, idx == 0))
                    .collect();
                TaggedSentence {
                    text: sentence.trim().to_string(),
                    tokens,
                }
            })
            .filter(|s| !s.tokens.is_empty())
            .collect();
        Ok(sentences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemmas_tags(sentence: &TaggedSentence) -> Vec<(String, String)> {
        sentence
            .tokens
            .iter()
            .map(|t| (t.lemma.clone(), t.tag.clone()))
            .collect()
    }

    #[test]
    fn tags_simple_sentence() {
        let tagger = LexiconTagger::default();
        let sentences = tagger.tag("The bill passed.").unwrap();

        assert_eq!(sentences.len(), 1);
        assert_eq!(
            lemmas_tags(&sentences[0]),
            vec![
                ("the".to_string(), "DET".to_string()),
                ("bill".to_string(), "NOUN".to_string()),
                ("pass".to_string(), "VERB".to_string()),
            ]
        );
    }

    #[test]
    fn sentence_split_and_proper_nouns() {
        let tagger = LexiconTagger::default();
        let sentences = tagger
            .tag("Order, order! The Deputy for Cork stopped quickly.")
            .unwrap();

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Order, order!");
        let second = lemmas_tags(&sentences[1]);
        assert!(second.contains(&("Deputy".to_string(), "PROPN".to_string())));
        assert!(second.contains(&("Cork".to_string(), "PROPN".to_string())));
        assert!(second.contains(&("stop".to_string(), "VERB".to_string())));
        assert!(second.contains(&("quickly".to_string(), "ADV".to_string())));
    }

    #[test]
    fn lexicon_wins() {
        let mut lexicon = HashMap::new();
        lexicon.insert(
            "went".to_string(),
            ("go".to_string(), "VERB".to_string()),
        );
        let tagger = LexiconTagger::new(lexicon);
        let sentences = tagger.tag("Members went home.").unwrap();
        let tokens = lemmas_tags(&sentences[0]);

        assert_eq!(tokens[0], ("member".to_string(), "NOUN".to_string()));
        assert_eq!(tokens[1], ("go".to_string(), "VERB".to_string()));
    }

    #[test]
    fn lexicon_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.tsv");
        std::fs::write(&path, "# comment\nTeachta\tteachta\tnoun\nbroken line\n").unwrap();

        let tagger = LexiconTagger::from_path(&path).unwrap();
        let sentences = tagger.tag("A Teachta spoke.").unwrap();
        assert_eq!(sentences[0].tokens[1].lemma, "teachta");
        assert_eq!(sentences[0].tokens[1].tag, "NOUN");
    }

    #[test]
    fn rejects_replacement_character() {
        let tagger = LexiconTagger::default();
        assert!(matches!(
            tagger.tag("caf\u{FFFD} order"),
            Err(Error::Tagging(_))
        ));
    }

    #[test]
    fn empty_text() {
        let tagger = LexiconTagger::default();
        assert!(tagger.tag("").unwrap().is_empty());
        assert!(tagger.tag("  ...  ").unwrap().is_empty());
    }

    #[test]
    fn lemma_guesses() {
        assert_eq!(guess_lemma("parties", "NOUN"), "party");
        assert_eq!(guess_lemma("class", "NOUN"), "class");
        assert_eq!(guess_lemma("debating", "VERB"), "debat");
        assert_eq!(guess_lemma("carried", "VERB"), "carry");
        assert_eq!(guess_lemma("running", "VERB"), "run");
        assert_eq!(guess_lemma("tossed", "VERB"), "toss");
    }

    #[test]
    fn multibyte_stems() {
        assert_eq!(undouble("\u{924}\u{924}"), "\u{924}\u{924}");
        assert_eq!(guess_lemma("\u{924}ed", "VERB"), "\u{924}");
        assert_eq!(guess_lemma("\u{924}\u{924}ing", "VERB"), "\u{924}\u{924}");
        assert_eq!(guess_lemma("caf\u{e9}\u{e9}ing", "VERB"), "caf\u{e9}\u{e9}");

        let tagger = LexiconTagger::default();
        let sentences = tagger.tag("The motion \u{924}ed today.").unwrap();
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].tokens.iter().any(|t| t.text == "motion"));
    }
}
