//! Core library for CFDI invoice classification.
//!
//! This crate provides:
//! - Source directory scanning for invoice XML files
//! - A namespace-aware XML document tree
//! - Field extraction (issue date, series, donation code) for CFDI 4.0
//! - Destination path planning and file placement with an error bucket
//! - A cancellable batch driver with progress reporting

pub mod batch;
pub mod cfdi;
pub mod document;
pub mod error;
pub mod layout;
pub mod models;
pub mod placer;
pub mod scanner;

pub use batch::{BatchDriver, BatchState, CancelToken, NoopObserver, ProgressObserver, classify};
pub use cfdi::{ComprobanteExtractor, KeyExtractor};
pub use document::{Document, Element};
pub use error::{CfdiError, FailureReason, ParseError, PlacementError, PreconditionError, Result};
pub use layout::DestinationPlanner;
pub use models::config::ClassifierConfig;
pub use models::key::ClassificationKey;
pub use models::report::{BatchResult, FileFailure, FileReport, Outcome};
pub use placer::FilePlacer;
