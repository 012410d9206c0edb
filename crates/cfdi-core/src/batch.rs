//! Batch driver: scan, then classify and place each file.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::cfdi::{ComprobanteExtractor, KeyExtractor};
use crate::document::SourceDocument;
use crate::error::{FailureReason, PreconditionError};
use crate::layout::DestinationPlanner;
use crate::models::config::ClassifierConfig;
use crate::models::key::ClassificationKey;
use crate::models::report::{BatchResult, FileReport, Outcome};
use crate::placer::FilePlacer;
use crate::scanner::scan_directory;

/// Lifecycle of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Scanning,
    /// Working on file `current` (1-based) of `total`.
    Processing { current: usize, total: usize },
    Done,
    /// Source or destination directory was unusable.
    Aborted,
}

/// Receives progress from a running batch. All methods default to no-ops.
pub trait ProgressObserver {
    fn on_state(&mut self, _state: BatchState) {}

    /// Called after each file with the number processed so far.
    fn on_file(&mut self, _processed: usize, _total: usize, _report: &FileReport) {}

    fn on_finish(&mut self, _result: &BatchResult) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Cooperative stop flag, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs one classification batch at a time.
pub struct BatchDriver {
    config: ClassifierConfig,
    extractor: ComprobanteExtractor,
    placer: FilePlacer,
    cancel: CancelToken,
    state: BatchState,
}

impl BatchDriver {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            extractor: ComprobanteExtractor::from_config(&config.extraction),
            placer: FilePlacer::from_config(&config.placement),
            config,
            cancel: CancelToken::new(),
            state: BatchState::Idle,
        }
    }

    /// Use a token shared with the caller so it can stop the run.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Classify every eligible file in `source` into `dest`.
    ///
    /// Only an unusable source or destination directory is an error; every
    /// per-file problem is recorded in the result and the run continues.
    pub fn run(
        &mut self,
        source: &Path,
        dest: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> crate::Result<BatchResult> {
        self.set_state(BatchState::Scanning, observer);

        let files = match check_directories(source, dest)
            .and_then(|()| scan_directory(source, &self.config.scan.extension))
        {
            Ok(files) => files,
            Err(e) => {
                error!("Batch aborted: {}", e);
                self.set_state(BatchState::Aborted, observer);
                return Err(e.into());
            }
        };

        let total = files.len();
        let mut result = BatchResult::new(total);
        let planner = DestinationPlanner::from_config(dest, &self.config.layout);

        if total == 0 {
            info!("No .{} files found in {}", self.config.scan.extension, source.display());
        } else {
            info!("Classifying {} files from {} into {}", total, source.display(), dest.display());
        }

        for (index, path) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!("Batch cancelled after {} of {} files", index, total);
                result.cancelled = true;
                break;
            }

            self.set_state(
                BatchState::Processing {
                    current: index + 1,
                    total,
                },
                observer,
            );

            let report = self.process_file(path, &planner);
            observer.on_file(index + 1, total, &report);
            result.record(report);
        }

        info!(
            "Batch finished: {} classified, {} errors",
            result.classified, result.errored
        );

        self.set_state(BatchState::Done, observer);
        observer.on_finish(&result);

        Ok(result)
    }

    /// Classify and place a single file, falling back to the error bucket.
    pub fn process_file(&self, path: &Path, planner: &DestinationPlanner) -> FileReport {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let outcome = match self.classify_and_place(path, planner) {
            Ok((key, destination)) => {
                debug!("{} -> {}", file_name, destination.display());
                Outcome::Classified { key, destination }
            }
            Err(reason) => {
                warn!("Error processing {}: {}", file_name, reason);
                self.route_to_errors(path, &file_name, planner, reason)
            }
        };

        FileReport { file_name, outcome }
    }

    fn classify_and_place(
        &self,
        path: &Path,
        planner: &DestinationPlanner,
    ) -> Result<(ClassificationKey, PathBuf), FailureReason> {
        let file_name = path
            .file_name()
            .ok_or_else(|| FailureReason::Anomaly(format!("{} has no file name", path.display())))?;

        let source = SourceDocument::load(path).map_err(FailureReason::Read)?;
        let document = source.parse()?;
        let key = self.extractor.extract_key(&document);

        let destination = self.placer.place(path, &planner.plan(&key), file_name)?;
        Ok((key, destination))
    }

    fn route_to_errors(
        &self,
        path: &Path,
        file_name: &str,
        planner: &DestinationPlanner,
        reason: FailureReason,
    ) -> Outcome {
        let bucket = planner.error_bucket();
        let name = path.file_name().unwrap_or_else(|| OsStr::new(file_name));

        match self.placer.place(path, &bucket, name) {
            Ok(destination) => Outcome::Routed {
                reason: reason.to_string(),
                destination: Some(destination),
            },
            Err(e) => {
                error!("Could not move {} to {}: {}", file_name, bucket.display(), e);
                Outcome::Routed {
                    reason: format!("{}; error bucket copy failed: {}", reason, e),
                    destination: None,
                }
            }
        }
    }

    fn set_state(&mut self, state: BatchState, observer: &mut dyn ProgressObserver) {
        self.state = state;
        observer.on_state(state);
    }
}

/// Classify `source` into `dest` with the default configuration.
pub fn classify(source: &Path, dest: &Path) -> crate::Result<BatchResult> {
    BatchDriver::new(ClassifierConfig::default()).run(source, dest, &mut NoopObserver)
}

fn check_directories(source: &Path, dest: &Path) -> Result<(), PreconditionError> {
    check_directory(
        source,
        PreconditionError::SourceMissing,
        PreconditionError::SourceNotDirectory,
    )?;
    check_directory(
        dest,
        PreconditionError::DestinationMissing,
        PreconditionError::DestinationNotDirectory,
    )
}

fn check_directory(
    path: &Path,
    missing: fn(PathBuf) -> PreconditionError,
    not_directory: fn(PathBuf) -> PreconditionError,
) -> Result<(), PreconditionError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(not_directory(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(missing(path.to_path_buf())),
        Err(source) => Err(PreconditionError::Inaccessible {
            path: path.to_path_buf(),
            source,
        }),
    }
}
