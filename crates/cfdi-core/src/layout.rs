//! Destination path planning.

use std::path::PathBuf;

use crate::models::config::LayoutConfig;
use crate::models::key::ClassificationKey;

/// Maps classification keys to directories under a destination root:
/// `root/<date>/<prefix><series>/<code>/`.
#[derive(Debug, Clone)]
pub struct DestinationPlanner {
    root: PathBuf,
    series_prefix: String,
    error_dir: String,
}

impl DestinationPlanner {
    /// Create a planner with the default layout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &LayoutConfig::default())
    }

    /// Create a planner from layout configuration.
    pub fn from_config(root: impl Into<PathBuf>, layout: &LayoutConfig) -> Self {
        Self {
            root: root.into(),
            series_prefix: layout.series_prefix.clone(),
            error_dir: layout.error_dir.clone(),
        }
    }

    /// Directory a file with this key belongs in.
    pub fn plan(&self, key: &ClassificationKey) -> PathBuf {
        self.root.join(self.relative(key))
    }

    /// Same as [`plan`](Self::plan), relative to the destination root.
    pub fn relative(&self, key: &ClassificationKey) -> PathBuf {
        let series = format!("{}{}", self.series_prefix, key.series);

        [
            path_segment(&key.date_folder),
            path_segment(&series),
            path_segment(&key.code),
        ]
        .iter()
        .collect()
    }

    /// The error bucket directory.
    pub fn error_bucket(&self) -> PathBuf {
        self.root.join(&self.error_dir)
    }
}

/// Keep a value to a single path component: separators become `_`.
fn path_segment(value: &str) -> String {
    value.replace(['/', '\\'], "_")
}
