//! Shard routing.
//!
//! [ShardRouter] is a two state machine (idle / shard open).
//! It can be driven step by step ([ShardRouter::open], [ShardRouter::write], [ShardRouter::close]),
//! or by year groups ([ShardRouter::route_year], [ShardRouter::route]) where the grouping
//! itself decides when shards are opened and closed.
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::align::AlignedLine;
use crate::error::Error;

use super::writer::{shard_filename, ShardSummary, ShardWriter};

enum State {
    Idle,
    Open(ShardWriter),
}

pub struct ShardRouter {
    dst: PathBuf,
    method: String,
    state: State,
}

impl ShardRouter {
    /// Shards are named `{method}_{year}.txt` and written in `dst`, which has to exist.
    pub fn new(dst: &Path, method: &str) -> Self {
        Self {
            dst: dst.to_path_buf(),
            method: method.to_string(),
            state: State::Idle,
        }
    }

    pub fn shard_path(&self, year: i32) -> PathBuf {
        self.dst.join(shard_filename(&self.method, year))
    }

    /// Year of the open shard, if any.
    pub fn open_year(&self) -> Option<i32> {
        match &self.state {
            State::Idle => None,
            State::Open(w) => Some(w.year()),
        }
    }

    pub fn open(&mut self, year: i32) -> Result<(), Error> {
        if let State::Open(w) = &self.state {
            return Err(Error::ShardAlreadyOpen {
                open: w.year(),
                requested: year,
            });
        }
        let writer = ShardWriter::create(&self.dst, &self.method, year)?;
        self.state = State::Open(writer);
        Ok(())
    }

    pub fn write(&mut self, line: &AlignedLine) -> Result<(), Error> {
        match &mut self.state {
            State::Open(w) => w.write_line(line),
            State::Idle => Err(Error::NoOpenShard),
        }
    }

    pub fn close(&mut self) -> Result<ShardSummary, Error> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Open(w) => w.finish(),
            State::Idle => Err(Error::NoOpenShard),
        }
    }

    /// Close the open shard and flag it as aborted.
    ///
    /// Returns the path of the flagged file, or [None] if no shard was open.
    pub fn abort(&mut self, reason: &Error) -> Result<Option<PathBuf>, Error> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Open(w) => {
                error!("{}: aborting shard: {}", w.year(), reason);
                w.abort().map(Some)
            }
            State::Idle => Ok(None),
        }
    }

    /// Write a whole year.
    ///
    /// The shard is opened first, so a year without lines gives an empty shard.
    /// It is closed once `lines` is exhausted, or aborted on the first error.
    pub fn route_year<I>(&mut self, year: i32, lines: I) -> Result<ShardSummary, Error>
    where
        I: IntoIterator<Item = Result<AlignedLine, Error>>,
    {
        self.open(year)?;
        for line in lines {
            if let Err(e) = line.and_then(|line| self.write(&line)) {
                if let Err(abort_error) = self.abort(&e) {
                    error!("{}: could not flag shard as aborted: {}", year, abort_error);
                }
                return Err(e);
            }
        }
        self.close()
    }

    /// Write a sequence of year groups.
    ///
    /// A failing year does not prevent the following ones from being written.
    pub fn route<G, I>(&mut self, groups: G) -> Vec<(i32, Result<ShardSummary, Error>)>
    where
        G: IntoIterator<Item = (i32, I)>,
        I: IntoIterator<Item = Result<AlignedLine, Error>>,
    {
        groups
            .into_iter()
            .map(|(year, lines)| {
                let result = self.route_year(year, lines);
                if let Ok(summary) = &result {
                    info!("{}: {} lines", year, summary.lines);
                }
                (year, result)
            })
            .collect()
    }
}

/// Shards left open (early termination, panic) are flagged as aborted.
impl Drop for ShardRouter {
    fn drop(&mut self) {
        if let State::Open(w) = std::mem::replace(&mut self.state, State::Idle) {
            let year = w.year();
            if let Err(e) = w.abort() {
                error!("{}: could not close shard on drop: {}", year, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::extract::UriPolicy;

    use super::*;

    fn line(date: (i32, u32, u32), eid: &str, text: &str) -> AlignedLine {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        AlignedLine {
            uri: UriPolicy::default().uri(&date, eid),
            text: text.to_string(),
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn open_write_close() {
        let dst = tempfile::tempdir().unwrap();
        let mut router = ShardRouter::new(dst.path(), "m");

        assert_eq!(router.open_year(), None);
        router.open(1923).unwrap();
        assert_eq!(router.open_year(), Some(1923));
        router.write(&line((1923, 1, 1), "para_1", "bill/NOUN")).unwrap();
        let summary = router.close().unwrap();

        assert_eq!(router.open_year(), None);
        assert_eq!(summary.lines, 1);
        assert_eq!(read(&router.shard_path(1923)), "1923-01-01/1: bill/NOUN\n");
    }

    #[test]
    fn second_open_is_rejected() {
        let dst = tempfile::tempdir().unwrap();
        let mut router = ShardRouter::new(dst.path(), "m");

        router.open(1923).unwrap();
        let err = router.open(1924).unwrap_err();
        assert!(matches!(
            err,
            Error::ShardAlreadyOpen {
                open: 1923,
                requested: 1924
            }
        ));
        // the open shard is untouched
        assert_eq!(router.open_year(), Some(1923));
        assert!(!dst.path().join("m_1924.txt.partial").exists());
    }

    #[test]
    fn write_and_close_need_an_open_shard() {
        let dst = tempfile::tempdir().unwrap();
        let mut router = ShardRouter::new(dst.path(), "m");

        assert!(matches!(
            router.write(&line((1923, 1, 1), "para_1", "x/NOUN")),
            Err(Error::NoOpenShard)
        ));
        assert!(matches!(router.close(), Err(Error::NoOpenShard)));
    }

    #[test]
    fn empty_year_gives_empty_shard() {
        let dst = tempfile::tempdir().unwrap();
        let mut router = ShardRouter::new(dst.path(), "m");

        let summary = router.route_year(1925, Vec::new()).unwrap();
        assert_eq!(summary.lines, 0);
        assert_eq!(read(&summary.path), "");
    }

    #[test_log::test]
    fn failing_year_is_aborted_and_next_year_written() {
        let dst = tempfile::tempdir().unwrap();
        let mut router = ShardRouter::new(dst.path(), "m");

        let groups = vec![
            (
                1923,
                vec![
                    Ok(line((1923, 1, 1), "para_1", "bill/NOUN")),
                    Err(Error::UnresolvedPosition {
                        position: 7,
                        len: 1,
                    }),
                    Ok(line((1923, 1, 1), "para_2", "never/ADV")),
                ],
            ),
            (1924, vec![Ok(line((1924, 6, 10), "para_1", "order/NOUN"))]),
        ];

        let results = router.route(groups);
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0].1,
            Err(Error::UnresolvedPosition { .. })
        ));
        assert!(!router.shard_path(1923).exists());
        assert_eq!(
            read(&dst.path().join("m_1923.txt.aborted")),
            "1923-01-01/1: bill/NOUN\n"
        );
        assert_eq!(results[1].1.as_ref().unwrap().lines, 1);
        assert_eq!(router.open_year(), None);
    }

    #[test]
    fn drop_closes_open_shard() {
        let dst = tempfile::tempdir().unwrap();
        {
            let mut router = ShardRouter::new(dst.path(), "m");
            router.open(1923).unwrap();
            router.write(&line((1923, 1, 1), "para_1", "bill/NOUN")).unwrap();
        }
        assert!(!dst.path().join("m_1923.txt.partial").exists());
        assert_eq!(
            read(&dst.path().join("m_1923.txt.aborted")),
            "1923-01-01/1: bill/NOUN\n"
        );
    }
}
