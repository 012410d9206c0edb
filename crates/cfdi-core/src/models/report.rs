//! Per-file outcomes and the aggregate batch result.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::key::ClassificationKey;

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Copied into its classified destination.
    Classified {
        key: ClassificationKey,
        destination: PathBuf,
    },

    /// Sent to the error bucket. `destination` is `None` when even the
    /// error-bucket copy failed.
    Routed {
        reason: String,
        destination: Option<PathBuf>,
    },
}

impl Outcome {
    pub fn is_classified(&self) -> bool {
        matches!(self, Outcome::Classified { .. })
    }

    /// Where the file was written, if anywhere.
    pub fn destination(&self) -> Option<&PathBuf> {
        match self {
            Outcome::Classified { destination, .. } => Some(destination),
            Outcome::Routed { destination, .. } => destination.as_ref(),
        }
    }
}

/// Outcome of one file, tagged with its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file_name: String,
    pub outcome: Outcome,
}

/// A file that did not make it into the classified tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file_name: String,
    pub reason: String,
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Number of eligible files found by the scanner.
    pub total: usize,

    /// Files copied into their classified destination.
    pub classified: usize,

    /// Files routed to the error bucket (or lost if that copy failed too).
    pub errored: usize,

    /// Failure reasons in processing order.
    pub failures: Vec<FileFailure>,

    /// Every attempted file in processing order.
    pub files: Vec<FileReport>,

    /// Set when the run stopped early on request.
    pub cancelled: bool,
}

impl BatchResult {
    /// Create an empty result for a batch of `total` files.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Number of files attempted so far.
    pub fn processed(&self) -> usize {
        self.classified + self.errored
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Append one file's outcome to the tallies.
    pub fn record(&mut self, report: FileReport) {
        match &report.outcome {
            Outcome::Classified { .. } => self.classified += 1,
            Outcome::Routed { reason, .. } => {
                self.errored += 1;
                self.failures.push(FileFailure {
                    file_name: report.file_name.clone(),
                    reason: reason.clone(),
                });
            }
        }
        self.files.push(report);
    }
}
