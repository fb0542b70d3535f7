use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::align::AlignedLine;
use crate::error::Error;

/// Outcome of a completed shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSummary {
    pub year: i32,
    pub path: PathBuf,
    pub lines: usize,
}

/// File name of a completed shard.
pub fn shard_filename(method: &str, year: i32) -> String {
    format!("{}_{}.txt", method, year)
}

/// Writer of a single year shard.
///
/// Lines go to `{name}.partial`, which is renamed to `{name}` by [ShardWriter::finish]
/// or to `{name}.aborted` by [ShardWriter::abort].
pub struct ShardWriter {
    year: i32,
    path: PathBuf,
    partial: PathBuf,
    file: BufWriter<File>,
    lines: usize,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl ShardWriter {
    /// Create the shard, truncating any previous partial file.
    ///
    /// Completed or aborted shards of a previous run for this year are removed.
    pub fn create(dst: &Path, method: &str, year: i32) -> Result<Self, Error> {
        let path = dst.join(shard_filename(method, year));
        let partial = with_suffix(&path, ".partial");

        remove_if_exists(&path)?;
        remove_if_exists(&with_suffix(&path, ".aborted"))?;

        info!("creating {:?}", path);
        let file = BufWriter::new(File::create(&partial)?);
        Ok(Self {
            year,
            path,
            partial,
            file,
            lines: 0,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn write_line(&mut self, line: &AlignedLine) -> Result<(), Error> {
        writeln!(self.file, "{}", line)?;
        self.lines += 1;
        Ok(())
    }

    /// Flush, close and move the shard to its final name.
    pub fn finish(self) -> Result<ShardSummary, Error> {
        let Self {
            year,
            path,
            partial,
            file,
            lines,
        } = self;

        let file = file.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        file.sync_all()?;
        drop(file);

        debug!("renaming {:?} to {:?}", partial, path);
        std::fs::rename(&partial, &path)?;
        info!("closed {:?} ({} lines)", path, lines);

        Ok(ShardSummary { year, path, lines })
    }

    /// Close the shard and flag it as aborted. Returns the path of the flagged file.
    pub fn abort(self) -> Result<PathBuf, Error> {
        let Self {
            path,
            partial,
            mut file,
            lines,
            ..
        } = self;

        if let Err(e) = file.flush() {
            warn!("could not flush aborted shard {:?}: {}", partial, e);
        }
        drop(file);

        let aborted = with_suffix(&path, ".aborted");
        std::fs::rename(&partial, &aborted)?;
        warn!("aborted {:?} after {} lines", aborted, lines);
        Ok(aborted)
    }
}

#[cfg(test)]
mod tests {
    use crate::extract::UriPolicy;

    use super::*;

    fn line(eid: &str, text: &str) -> AlignedLine {
        let date = chrono::NaiveDate::from_ymd_opt(1923, 1, 1).unwrap();
        AlignedLine {
            uri: UriPolicy::default().uri(&date, eid),
            text: text.to_string(),
        }
    }

    #[test]
    fn finish_renames() {
        let dst = tempfile::tempdir().unwrap();
        let mut w = ShardWriter::create(dst.path(), "lexicon-pos-para", 1923).unwrap();

        assert!(dst.path().join("lexicon-pos-para_1923.txt.partial").exists());
        w.write_line(&line("para_1", "bill/NOUN")).unwrap();
        w.write_line(&line("para_2", "order/NOUN")).unwrap();

        let summary = w.finish().unwrap();
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.path, dst.path().join("lexicon-pos-para_1923.txt"));
        assert!(!dst.path().join("lexicon-pos-para_1923.txt.partial").exists());

        let content = std::fs::read_to_string(&summary.path).unwrap();
        assert_eq!(content, "1923-01-01/1: bill/NOUN\n1923-01-01/2: order/NOUN\n");
    }

    #[test]
    fn abort_flags_file() {
        let dst = tempfile::tempdir().unwrap();
        let mut w = ShardWriter::create(dst.path(), "m", 1923).unwrap();
        w.write_line(&line("para_1", "bill/NOUN")).unwrap();

        let aborted = w.abort().unwrap();
        assert_eq!(aborted, dst.path().join("m_1923.txt.aborted"));
        assert!(aborted.exists());
        assert!(!dst.path().join("m_1923.txt").exists());
    }

    #[test]
    fn create_removes_previous_outcome() {
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(dst.path().join("m_1923.txt"), "stale\n").unwrap();
        std::fs::write(dst.path().join("m_1923.txt.aborted"), "stale\n").unwrap();

        let w = ShardWriter::create(dst.path(), "m", 1923).unwrap();
        assert!(!dst.path().join("m_1923.txt").exists());
        assert!(!dst.path().join("m_1923.txt.aborted").exists());

        let summary = w.finish().unwrap();
        assert_eq!(std::fs::read_to_string(summary.path).unwrap(), "");
    }
}
