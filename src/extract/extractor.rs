use std::io::{Read, Seek};

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::error::Error;
use crate::sources::{Archive, SourceRef};

use super::document::{Paragraph, SourceDocument};
use super::uri::{SourceUri, UriPolicy};

/// A paragraph along with its corpus-wide URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedParagraph {
    pub uri: SourceUri,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub documents: usize,
    pub skipped_documents: usize,
    pub paragraphs: usize,
}

/// Lazy paragraph iterator over the sittings of a year.
///
/// Transcripts are read and parsed only when the previous one is exhausted.
/// Unreadable or malformed transcripts are logged and skipped.
/// The iterator is not restartable: build a new one to read the sittings again.
pub struct ParagraphExtractor<'a, R> {
    archive: &'a mut Archive<R>,
    sittings: std::slice::Iter<'a, SourceRef>,
    policy: &'a UriPolicy,
    current: Option<(NaiveDate, std::vec::IntoIter<Paragraph>)>,
    stats: ExtractionStats,
}

impl<'a, R: Read + Seek> ParagraphExtractor<'a, R> {
    pub fn new(archive: &'a mut Archive<R>, sittings: &'a [SourceRef], policy: &'a UriPolicy) -> Self {
        Self {
            archive,
            sittings: sittings.iter(),
            policy,
            current: None,
            stats: ExtractionStats::default(),
        }
    }

    pub fn stats(&self) -> ExtractionStats {
        self.stats
    }

    fn read_document(&mut self, sitting: &SourceRef) -> Result<SourceDocument, Error> {
        let bytes = self.archive.read(&sitting.name).map_err(|e| Error::MalformedDocument {
            name: sitting.name.clone(),
            reason: e.to_string(),
        })?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!("{}: invalid utf-8, decoding lossily", sitting.name);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        SourceDocument::parse(&sitting.name, &content)
    }

    /// Open the next readable sitting. Returns false once every sitting has been read.
    fn next_document(&mut self) -> bool {
        while let Some(sitting) = self.sittings.next() {
            debug!("reading {}", sitting.name);
            match self.read_document(sitting) {
                Ok(doc) => {
                    if doc.date() != &sitting.date {
                        debug!(
                            "{}: declared date {} differs from file name",
                            sitting.name,
                            doc.date()
                        );
                    }
                    self.stats.documents += 1;
                    self.stats.paragraphs += doc.paragraphs().len();
                    if self.stats.documents % 20 == 0 {
                        info!(
                            "{}: {} paragraphs from {} sittings",
                            sitting.date.format("%Y"),
                            self.stats.paragraphs,
                            self.stats.documents
                        );
                    }
                    let date = *doc.date();
                    self.current = Some((date, doc.into_paragraphs().into_iter()));
                    return true;
                }
                Err(e) => {
                    warn!("skipping sitting: {}", e);
                    self.stats.skipped_documents += 1;
                }
            }
        }
        false
    }
}

impl<'a, R: Read + Seek> Iterator for ParagraphExtractor<'a, R> {
    type Item = ExtractedParagraph;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((date, paragraphs)) = &mut self.current {
                if let Some(paragraph) = paragraphs.next() {
                    let uri = self.policy.uri(date, paragraph.eid());
                    return Some(ExtractedParagraph {
                        uri,
                        text: paragraph.into_text(),
                    });
                }
            }
            self.current = None;
            if !self.next_document() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use crate::sources::{EntryPattern, SourceIndex, YearRange};

    use super::*;

    fn sitting(date: &str, paragraphs: &[(&str, &str)]) -> String {
        let ps: String = paragraphs
            .iter()
            .map(|(eid, text)| format!(r#"<p eId="{eid}">{text}</p>"#))
            .collect();
        format!(
            r#"<akomaNtoso><debate><meta><FRBRWork><FRBRdate date="{date}"/></FRBRWork></meta>
            <debateBody><speech>{ps}</speech></debateBody></debate></akomaNtoso>"#
        )
    }

    fn archive<C: AsRef<[u8]>>(files: &[(&str, C)]) -> Archive<Cursor<Vec<u8>>> {
        let mut w = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            w.start_file(*name, SimpleFileOptions::default()).unwrap();
            w.write_all(content.as_ref()).unwrap();
        }
        Archive::new(Cursor::new(w.finish().unwrap().into_inner())).unwrap()
    }

    #[test]
    fn archive_then_document_order() {
        let mut a = archive(&[
            (
                "dail/AK-dail-1923-02-01.xml",
                sitting("1923-02-01", &[("para_1", "b1"), ("para_2", "b2")]),
            ),
            (
                "dail/AK-dail-1923-01-01.xml",
                sitting("1923-01-01", &[("para_1", "a1")]),
            ),
        ]);
        let range = YearRange::new(1923, 1923).unwrap();
        let index = SourceIndex::build(&mut a, range, &EntryPattern::default()).unwrap();
        let policy = UriPolicy::default();

        let mut extractor = ParagraphExtractor::new(&mut a, index.get(1923), &policy);
        let paragraphs: Vec<_> = extractor
            .by_ref()
            .map(|p| (p.uri.to_string(), p.text))
            .collect();

        assert_eq!(
            paragraphs,
            vec![
                ("1923-02-01/1".to_string(), "b1".to_string()),
                ("1923-02-01/2".to_string(), "b2".to_string()),
                ("1923-01-01/1".to_string(), "a1".to_string()),
            ]
        );
        assert_eq!(
            extractor.stats(),
            ExtractionStats {
                documents: 2,
                skipped_documents: 0,
                paragraphs: 3
            }
        );
    }

    #[test_log::test]
    fn malformed_sitting_is_skipped() {
        let mut a = archive(&[
            ("dail/AK-dail-1923-01-01.xml", "<broken".to_string()),
            (
                "dail/AK-dail-1923-01-02.xml",
                sitting("1923-01-02", &[("para_1", "kept"), ("para_2", "")]),
            ),
        ]);
        let range = YearRange::new(1923, 1923).unwrap();
        let index = SourceIndex::build(&mut a, range, &EntryPattern::default()).unwrap();
        let policy = UriPolicy::default();

        let mut extractor = ParagraphExtractor::new(&mut a, index.get(1923), &policy);
        let texts: Vec<_> = extractor.by_ref().map(|p| p.text).collect();

        // empty paragraphs still occupy a position
        assert_eq!(texts, vec!["kept".to_string(), String::new()]);
        assert_eq!(extractor.stats().skipped_documents, 1);
        assert_eq!(extractor.stats().documents, 1);
    }

    #[test_log::test]
    fn invalid_utf8_is_decoded_lossily() {
        // a raw windows-1252 quote is not valid utf-8
        let content: Vec<u8> = sitting("1923-01-01", &[("para_1", "a"), ("para_2", "@b@")])
            .bytes()
            .map(|b| if b == b'@' { 0x93 } else { b })
            .collect();
        let mut a = archive(&[("dail/AK-dail-1923-01-01.xml", content)]);
        let range = YearRange::new(1923, 1923).unwrap();
        let index = SourceIndex::build(&mut a, range, &EntryPattern::default()).unwrap();
        let policy = UriPolicy::default();

        let mut extractor = ParagraphExtractor::new(&mut a, index.get(1923), &policy);
        let paragraphs: Vec<_> = extractor
            .by_ref()
            .map(|p| (p.uri.to_string(), p.text))
            .collect();

        assert_eq!(
            paragraphs,
            vec![
                ("1923-01-01/1".to_string(), "a".to_string()),
                ("1923-01-01/2".to_string(), "\u{FFFD}b\u{FFFD}".to_string()),
            ]
        );
        assert_eq!(extractor.stats().skipped_documents, 0);
    }

    #[test]
    fn no_sittings() {
        let mut a = archive::<String>(&[]);
        let policy = UriPolicy::default();
        let mut extractor = ParagraphExtractor::new(&mut a, &[], &policy);
        assert!(extractor.next().is_none());
    }
}
