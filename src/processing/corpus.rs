//! Reading tagged shards back.
//!
//! Downstream consumers (embedding training) see each line as a URI prefix to discard,
//! followed by whitespace separated tagged tokens.
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use itertools::Either;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::error::Error;

lazy_static! {
    static ref SHARD_YEAR: Regex = Regex::new(r"_(\d{4})\.txt$").unwrap();
}

/// Tagged tokens of a shard line, without its URI prefix.
pub fn line_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().skip(1).map(String::from).collect()
}

/// Half-open periods `[p, p + interval)` for `p` in `start, start + interval, ..` below `end`.
pub fn periods(start: i32, end: i32, interval: i32) -> Vec<(i32, i32)> {
    if interval <= 0 {
        return Vec::new();
    }
    (start..end)
        .step_by(interval as usize)
        .map(|p| (p, p + interval))
        .collect()
}

/// Year shards of an output folder.
#[derive(Debug, Clone)]
pub struct CorpusReader {
    shards: Vec<(i32, PathBuf)>,
}

impl CorpusReader {
    /// List completed shards (`*_{year}.txt`) in `src`.
    pub fn new(src: &Path) -> Result<Self, Error> {
        let pattern = src.join("*.txt");
        let pattern = pattern
            .to_str()
            .ok_or_else(|| Error::Custom(format!("invalid path {:?}", src)))?;

        let mut shards = Vec::new();
        for path in glob::glob(pattern)? {
            let path = path?;
            let year = path
                .file_name()
                .and_then(|f| f.to_str())
                .and_then(|f| SHARD_YEAR.captures(f))
                .and_then(|caps| caps[1].parse::<i32>().ok());
            match year {
                Some(year) => shards.push((year, path)),
                None => debug!("ignoring {:?}", path),
            }
        }
        shards.sort();
        Ok(Self { shards })
    }

    pub fn shards(&self) -> &[(i32, PathBuf)] {
        &self.shards
    }

    /// Token lists of every line of shards in `[start, end)`, in year order.
    pub fn lines(&self, start: i32, end: i32) -> impl Iterator<Item = Result<Vec<String>, Error>> + '_ {
        self.shards
            .iter()
            .filter(move |(year, _)| start <= *year && *year < end)
            .flat_map(|(_, path)| match File::open(path) {
                Ok(f) => Either::Left(
                    BufReader::new(f)
                        .lines()
                        .map(|line| line.map(|l| line_tokens(&l)).map_err(Error::Io)),
                ),
                Err(e) => Either::Right(std::iter::once(Err(Error::Io(e)))),
            })
    }

    /// Line, token and vocabulary counts per period.
    pub fn stats(&self, start: i32, end: i32, interval: i32) -> Result<Vec<PeriodStats>, Error> {
        periods(start, end, interval)
            .into_iter()
            .map(|(p_start, p_end)| {
                let mut stats = PeriodStats {
                    start: p_start,
                    end: p_end - 1,
                    ..Default::default()
                };
                let mut vocabulary = HashSet::new();
                for tokens in self.lines(p_start, p_end) {
                    let tokens = tokens?;
                    stats.lines += 1;
                    stats.tokens += tokens.len();
                    vocabulary.extend(tokens);
                }
                stats.vocabulary = vocabulary.len();
                Ok(stats)
            })
            .collect()
    }
}

/// Counts of a period, both years included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub start: i32,
    pub end: i32,
    pub lines: usize,
    pub tokens: usize,
    pub vocabulary: usize,
}
