use chrono::NaiveDate;
use log::warn;
use roxmltree::{Node, ParsingOptions};

use crate::error::Error;

/// One speech paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    eid: String,
    text: String,
}

impl Paragraph {
    pub fn new(eid: String, text: String) -> Self {
        Self { eid, text }
    }

    /// Element identifier, unique within its transcript.
    pub fn eid(&self) -> &str {
        &self.eid
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// A parsed transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    name: String,
    date: NaiveDate,
    paragraphs: Vec<Paragraph>,
}

#[inline]
fn has_name(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

#[inline]
fn parent_has_name(node: &Node, name: &str) -> bool {
    node.parent_element()
        .map(|parent| has_name(&parent, name))
        .unwrap_or(false)
}

impl SourceDocument {
    /// Parse a transcript.
    ///
    /// Element names are matched regardless of their namespace.
    pub fn parse(name: &str, content: &str) -> Result<Self, Error> {
        let malformed = |reason: String| Error::MalformedDocument {
            name: name.to_string(),
            reason,
        };

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(content, options)
            .map_err(|e| malformed(e.to_string()))?;

        let date = doc
            .descendants()
            .find(|n| has_name(n, "FRBRdate") && parent_has_name(n, "FRBRWork"))
            .and_then(|n| n.attribute("date"))
            .ok_or_else(|| malformed("no FRBRWork/FRBRdate@date".to_string()))?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| malformed(format!("invalid sitting date {date:?}: {e}")))?;

        let paragraphs = doc
            .descendants()
            .filter(|n| has_name(n, "p") && parent_has_name(n, "speech"))
            .filter_map(|p| match p.attribute("eId") {
                Some(eid) => {
                    let text = p
                        .descendants()
                        .filter(|n| n.is_text())
                        .filter_map(|n| n.text())
                        .collect::<Vec<_>>()
                        .join(" ");
                    Some(Paragraph::new(eid.to_string(), text))
                }
                None => {
                    warn!("{}: paragraph without eId, skipping", name);
                    None
                }
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            date,
            paragraphs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> &NaiveDate {
        &self.date
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn into_paragraphs(self) -> Vec<Paragraph> {
        self.paragraphs
    }
}
