//! Sitting index.
//!
//! Transcript members are named after their sitting date (`dail/AK-dail-1923-01-01.xml`),
//! which lets us group them by year without opening them.
use std::collections::BTreeMap;
use std::io::{Read, Seek};

use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};
use regex::Regex;

use crate::config::PipelineConfig;
use crate::error::Error;

use super::Archive;

/// Inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, Error> {
        if start > end {
            return Err(Error::Custom(format!(
                "start year {start} is after end year {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }

    /// Split the range into at most `parts` contiguous, disjoint ranges.
    pub fn split(&self, parts: usize) -> Vec<YearRange> {
        let nb_years = (self.end - self.start + 1) as usize;
        let parts = parts.clamp(1, nb_years);
        let base = nb_years / parts;
        let extra = nb_years % parts;

        let mut ranges = Vec::with_capacity(parts);
        let mut start = self.start;
        for i in 0..parts {
            let len = (base + usize::from(i < extra)) as i32;
            ranges.push(YearRange {
                start,
                end: start + len - 1,
            });
            start += len;
        }
        ranges
    }
}

/// Member name matching rules.
#[derive(Debug, Clone)]
pub struct EntryPattern {
    prefix: String,
    date: Regex,
}

impl EntryPattern {
    /// `date` has to capture year, month and day, in that order.
    pub fn new(prefix: &str, date: &str) -> Result<Self, Error> {
        let date = Regex::new(date)?;
        if date.captures_len() < 4 {
            return Err(Error::Custom(format!(
                "date pattern {date} must capture year, month and day"
            )));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            date,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, Error> {
        Self::new(&config.entry_prefix, &config.date_pattern)
    }

    /// Returns [None] for members that are not transcripts,
    /// and an error for transcripts whose name holds no valid date.
    pub fn parse(&self, name: &str) -> Option<Result<NaiveDate, Error>> {
        if !name.starts_with(&self.prefix) {
            return None;
        }

        let malformed = |reason: &str| Error::MalformedArchiveEntry {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let date = match self.date.captures(name) {
            Some(caps) => {
                // groups are optional in user supplied patterns
                let group = |i: usize| caps.get(i).map(|m| m.as_str());
                let year = group(1).and_then(|y| y.parse::<i32>().ok());
                let month = group(2).and_then(|m| m.parse::<u32>().ok());
                let day = group(3).and_then(|d| d.parse::<u32>().ok());
                match (year, month, day) {
                    (Some(y), Some(m), Some(d)) => {
                        NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| malformed("invalid date"))
                    }
                    _ => Err(malformed("unparseable date")),
                }
            }
            None => Err(malformed("no date in name")),
        };
        Some(date)
    }
}

impl Default for EntryPattern {
    fn default() -> Self {
        let config = PipelineConfig::default();
        Self {
            prefix: config.entry_prefix,
            date: Regex::new(&config.date_pattern).expect("default date pattern is valid"),
        }
    }
}

/// A transcript member of the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub name: String,
    pub date: NaiveDate,
}

/// Transcripts grouped by sitting year, in archive order.
///
/// Every year of the range has an entry, even when no transcript falls in it.
#[derive(Debug, Clone)]
pub struct SourceIndex {
    range: YearRange,
    years: BTreeMap<i32, Vec<SourceRef>>,
    skipped: usize,
}

impl SourceIndex {
    pub fn build<R: Read + Seek>(
        archive: &mut Archive<R>,
        range: YearRange,
        pattern: &EntryPattern,
    ) -> Result<Self, Error> {
        let mut years: BTreeMap<i32, Vec<SourceRef>> =
            range.years().map(|year| (year, Vec::new())).collect();
        let mut skipped = 0;

        for member in archive.members()? {
            if member.is_dir {
                continue;
            }
            match pattern.parse(&member.name) {
                None => debug!("ignoring member {}", member.name),
                Some(Err(e)) => {
                    warn!("skipping entry: {}", e);
                    skipped += 1;
                }
                Some(Ok(date)) => {
                    if let Some(sittings) = years.get_mut(&date.year()) {
                        sittings.push(SourceRef {
                            name: member.name,
                            date,
                        });
                    }
                }
            }
        }

        for (year, sittings) in &years {
            info!("{}: {} sittings", year, sittings.len());
        }

        Ok(Self {
            range,
            years,
            skipped,
        })
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    /// Sittings of a year. Empty for years outside of the range.
    pub fn get(&self, year: i32) -> &[SourceRef] {
        self.years.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn years(&self) -> impl Iterator<Item = (i32, &[SourceRef])> {
        self.years.iter().map(|(y, s)| (*y, s.as_slice()))
    }

    pub fn nb_documents(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    /// Number of transcript members skipped because of a malformed name.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    fn archive(names: &[&str]) -> Archive<Cursor<Vec<u8>>> {
        let mut w = ZipWriter::new(Cursor::new(Vec::new()));
        for name in names {
            w.start_file(*name, SimpleFileOptions::default()).unwrap();
            w.write_all(b"<akomaNtoso/>").unwrap();
        }
        let bytes = w.finish().unwrap().into_inner();
        Archive::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn groups_by_year() {
        let mut a = archive(&[
            "dail/AK-dail-1923-03-01.xml",
            "dail/AK-dail-1922-12-06.xml",
            "dail/AK-dail-1923-01-10.xml",
            "dail/AK-dail-1930-01-10.xml",
            "seanad/AK-seanad-1923-01-01.xml",
        ]);
        let range = YearRange::new(1922, 1924).unwrap();
        let index = SourceIndex::build(&mut a, range, &EntryPattern::default()).unwrap();

        let names_1923: Vec<_> = index.get(1923).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names_1923,
            vec!["dail/AK-dail-1923-03-01.xml", "dail/AK-dail-1923-01-10.xml"]
        );
        assert_eq!(index.get(1922).len(), 1);
        assert!(index.get(1924).is_empty());
        assert!(index.get(1930).is_empty());
        assert_eq!(index.years().count(), 3);
        assert_eq!(index.nb_documents(), 3);
        assert_eq!(index.skipped(), 0);
    }

    #[test_log::test]
    fn malformed_names_are_skipped() {
        let mut a = archive(&[
            "dail/AK-dail-1923-01-01.xml",
            "dail/AK-dail-undated.xml",
            "dail/AK-dail-1923-02-30.xml",
        ]);
        let range = YearRange::new(1923, 1923).unwrap();
        let index = SourceIndex::build(&mut a, range, &EntryPattern::default()).unwrap();

        assert_eq!(index.get(1923).len(), 1);
        assert_eq!(index.skipped(), 2);
    }

    #[test]
    fn pattern_parse() {
        let p = EntryPattern::default();
        assert!(p.parse("other/file.xml").is_none());
        assert_eq!(
            p.parse("dail/AK-dail-1924-06-10.xml").unwrap().unwrap(),
            NaiveDate::from_ymd_opt(1924, 6, 10).unwrap()
        );
        assert!(matches!(
            p.parse("dail/AK-dail-1924.xml"),
            Some(Err(Error::MalformedArchiveEntry { .. }))
        ));
    }

    #[test]
    fn optional_group_without_match() {
        let p = EntryPattern::new("dail/", r"-(\d{4})?-(\d{2})-(\d{2})\.xml$").unwrap();
        assert!(matches!(
            p.parse("dail/AK-dail--01-01.xml"),
            Some(Err(Error::MalformedArchiveEntry { .. }))
        ));
        assert_eq!(
            p.parse("dail/AK-dail-1925-01-01.xml").unwrap().unwrap(),
            NaiveDate::from_ymd_opt(1925, 1, 1).unwrap()
        );
    }

    #[test]
    fn pattern_needs_captures() {
        assert!(EntryPattern::new("dail/", r"\d{4}").is_err());
    }

    #[test]
    fn split_range() {
        let r = YearRange::new(1920, 1929).unwrap();
        let parts = r.split(3);
        assert_eq!(
            parts,
            vec![
                YearRange::new(1920, 1923).unwrap(),
                YearRange::new(1924, 1926).unwrap(),
                YearRange::new(1927, 1929).unwrap(),
            ]
        );

        let r = YearRange::new(1920, 1921).unwrap();
        assert_eq!(r.split(8).len(), 2);
        assert_eq!(r.split(0).len(), 1);
    }

    #[test]
    fn invalid_range() {
        assert!(YearRange::new(1925, 1920).is_err());
    }
}
