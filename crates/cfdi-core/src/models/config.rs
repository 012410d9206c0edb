//! Configuration structures for the classification pipeline.

use serde::{Deserialize, Serialize};

/// CFDI 4.0 namespace URI.
pub const CFDI_V4_NAMESPACE: &str = "http://www.sat.gob.mx/cfd/4";

/// Main configuration for the classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Source scanning configuration.
    pub scan: ScanConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Destination tree layout.
    pub layout: LayoutConfig,

    /// File copy behavior.
    pub placement: PlacementConfig,
}

/// Source directory scanning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extension to pick up, without the dot. Matched case-sensitively.
    pub extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "xml".to_string(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Namespace URI of the `Concepto` elements.
    pub namespace: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            namespace: CFDI_V4_NAMESPACE.to_string(),
        }
    }
}

/// Destination tree layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Name of the error bucket directory under the destination root.
    pub error_dir: String,

    /// Prefix prepended to the series folder name.
    pub series_prefix: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            error_dir: "ERRORES".to_string(),
            series_prefix: "Serie ".to_string(),
        }
    }
}

/// File copy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Keep the source modification time on copied files.
    pub preserve_timestamps: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            preserve_timestamps: true,
        }
    }
}

impl ClassifierConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{ "layout": { "error_dir": "FAILED" } }"#).unwrap();

        assert_eq!(config.layout.error_dir, "FAILED");
        assert_eq!(config.layout.series_prefix, "Serie ");
        assert_eq!(config.scan.extension, "xml");
        assert_eq!(config.extraction.namespace, CFDI_V4_NAMESPACE);
        assert!(config.placement.preserve_timestamps);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ClassifierConfig::default();
        config.placement.preserve_timestamps = false;
        config.save(&path).unwrap();

        let loaded = ClassifierConfig::from_file(&path).unwrap();
        assert!(!loaded.placement.preserve_timestamps);
    }
}
