//! Paragraph text repair.
//!
//! Older transcripts were converted from windows-1252 without decoding, leaving C1 control
//! characters where curly quotes, dashes or ligatures used to be.
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;

lazy_static! {
    // a soft hyphen next to a hyphen, on either side, collapses into that single hyphen
    static ref SOFT_HYPHEN: Regex = Regex::new("-\u{ad}|\u{ad}-|\u{ad}").unwrap();
}

/// Character level replacements for mis-decoded windows-1252 bytes.
fn repair_char(c: char, out: &mut String) {
    match c {
        '\u{93}' | '\u{94}' => out.push('"'),
        '\u{91}' | '\u{92}' => out.push('\''),
        '\u{95}' | '\u{97}' => out.push(' '),
        '\u{9c}' => out.push_str("oe"),
        '\u{8a}' => out.push('Š'),
        '\u{85}' | '\u{96}' | '\u{9d}' => (),
        c => out.push(c),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    repair: bool,
    replacements: Vec<(String, String)>,
}

impl Normalizer {
    pub fn new(repair: bool, replacements: Vec<(String, String)>) -> Self {
        Self {
            repair,
            replacements,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.normalize, config.replacements.clone())
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut text = if self.repair {
            let mut repaired = String::with_capacity(text.len());
            for c in text.chars() {
                repair_char(c, &mut repaired);
            }
            SOFT_HYPHEN.replace_all(&repaired, "-").into_owned()
        } else {
            text.to_string()
        };

        for (from, to) in &self.replacements {
            if text.contains(from.as_str()) {
                text = text.replace(from.as_str(), to);
            }
        }
        text
    }
}
