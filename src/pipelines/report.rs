//! Run reports.
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum YearStatus {
    Completed,
    Aborted { reason: String },
}

/// Counters of a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearReport {
    pub year: i32,
    pub sittings: usize,
    /// Sittings read and parsed.
    pub documents: usize,
    pub skipped_documents: usize,
    pub paragraphs: usize,
    /// Empty paragraphs dropped before annotation.
    pub empty_paragraphs: usize,
    /// Texts sent to the annotator.
    pub inputs: usize,
    pub records: usize,
    /// Inputs the annotator could not process.
    pub skipped_inputs: usize,
    pub lines_written: usize,
    #[serde(flatten)]
    pub status: YearStatus,
}

impl YearReport {
    pub fn new(year: i32, sittings: usize) -> Self {
        Self {
            year,
            sittings,
            documents: 0,
            skipped_documents: 0,
            paragraphs: 0,
            empty_paragraphs: 0,
            inputs: 0,
            records: 0,
            skipped_inputs: 0,
            lines_written: 0,
            status: YearStatus::Completed,
        }
    }

    /// Report of a year that could not be started at all.
    pub fn aborted(year: i32, sittings: usize, reason: &Error) -> Self {
        Self {
            status: YearStatus::Aborted {
                reason: reason.to_string(),
            },
            ..Self::new(year, sittings)
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.status, YearStatus::Aborted { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub method: String,
    pub start_year: i32,
    pub end_year: i32,
    /// Archive members skipped because of a malformed name.
    pub skipped_entries: usize,
    pub years: Vec<YearReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.years.iter().all(|y| !y.is_aborted())
    }

    pub fn aborted_years(&self) -> Vec<i32> {
        self.years
            .iter()
            .filter(|y| y.is_aborted())
            .map(|y| y.year)
            .collect()
    }

    pub fn log(&self) {
        if self.skipped_entries > 0 {
            warn!("{} archive entries skipped", self.skipped_entries);
        }
        for y in &self.years {
            match &y.status {
                YearStatus::Completed => info!(
                    "{}: {} paragraphs ({} empty), {} inputs, {} skipped, {} lines written",
                    y.year, y.paragraphs, y.empty_paragraphs, y.inputs, y.skipped_inputs, y.lines_written
                ),
                YearStatus::Aborted { reason } => error!(
                    "{}: ABORTED after {} inputs ({} skipped): {}",
                    y.year, y.inputs, y.skipped_inputs, reason
                ),
            }
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let f = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(f, self)?;
        Ok(())
    }
}
