//! Error types for the cfdi-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the cfdi library.
#[derive(Error, Debug)]
pub enum CfdiError {
    /// The batch cannot start.
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// Document parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// File placement error.
    #[error("placement error: {0}")]
    Placement(#[from] PlacementError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors that stop a batch before any file is touched.
#[derive(Error, Debug)]
pub enum PreconditionError {
    /// The source directory does not exist.
    #[error("source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The source path exists but is not a directory.
    #[error("source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    /// The destination directory does not exist.
    #[error("destination directory not found: {}", .0.display())]
    DestinationMissing(PathBuf),

    /// The destination path exists but is not a directory.
    #[error("destination is not a directory: {}", .0.display())]
    DestinationNotDirectory(PathBuf),

    /// A directory could not be listed or inspected.
    #[error("cannot access {}: {source}", path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading document markup.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The markup is not well-formed.
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    /// An element or attribute uses a prefix with no namespace declaration.
    #[error("unbound namespace prefix: {0}")]
    UnboundPrefix(String),

    /// The document has no root element.
    #[error("document has no root element")]
    NoRoot,

    /// The document ended while elements were still open.
    #[error("unexpected end of document, unclosed element <{0}>")]
    Unclosed(String),

    /// Content found outside the single root element.
    #[error("content outside root element: {0}")]
    OutsideRoot(String),
}

/// Errors raised while copying a file into the destination tree.
#[derive(Error, Debug)]
pub enum PlacementError {
    /// A destination directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The copy itself failed.
    #[error("failed to copy to {}: {source}", to.display())]
    Copy {
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single file ended up in the error bucket.
#[derive(Error, Debug)]
pub enum FailureReason {
    /// The file could not be read.
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    /// The content is not well-formed markup.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Something unexpected happened while deriving the classification.
    #[error("processing anomaly: {0}")]
    Anomaly(String),

    /// The classified destination could not be written.
    #[error("{0}")]
    Placement(#[from] PlacementError),
}

/// Result type for the cfdi library.
pub type Result<T> = std::result::Result<T, CfdiError>;
