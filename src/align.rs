/*! Position to URI alignment.

Annotators batch and reshape their input: a paragraph can give zero, one or several records.
Records only carry the position of the input they derive from, and [UriIndex] maps that position
back to the URI of the paragraph, which is what ends up as the line prefix.

A record pointing outside of the index is an alignment bug: it is never written under a guessed URI.
!*/
use std::fmt;

use crate::annotate::AnnotatedRecord;
use crate::error::Error;
use crate::extract::SourceUri;

/// Ordered URIs of a year's annotator inputs: position `i` holds the URI of the `i`-th input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriIndex {
    uris: Vec<SourceUri>,
}

impl UriIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the URI of the next input and return its position.
    pub fn push(&mut self, uri: SourceUri) -> usize {
        self.uris.push(uri);
        self.uris.len() - 1
    }

    pub fn get(&self, position: usize) -> Option<&SourceUri> {
        self.uris.get(position)
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    /// Resolve a record to its output line.
    pub fn resolve(&self, record: &AnnotatedRecord, separator: &str) -> Result<AlignedLine, Error> {
        let uri = self
            .uris
            .get(record.position)
            .ok_or(Error::UnresolvedPosition {
                position: record.position,
                len: self.uris.len(),
            })?;
        Ok(AlignedLine {
            uri: uri.clone(),
            text: record.render(separator),
        })
    }
}

/// An annotated line, attributed to its paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedLine {
    pub uri: SourceUri,
    pub text: String,
}

/// `uri: text`, without the trailing newline.
impl fmt::Display for AlignedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.uri, self.text)
    }
}
