//! The classification key derived from one invoice.

use serde::{Deserialize, Serialize};

/// Date folder used when the issue date is missing or invalid.
pub const NO_DATE: &str = "SIN_FECHA";

/// Series used when the document has no `Serie` attribute.
pub const NO_SERIES: &str = "SIN_SERIE";

/// Code folder used when no donation code is found.
pub const NO_CODE: &str = "SIN_CODIGO";

/// The `(date, series, code)` triple that decides where a file lands.
///
/// Every field is always populated: missing values are replaced by the
/// sentinels above, so every parsed document has exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationKey {
    /// Issue date as `YYYY-MM-DD`, or [`NO_DATE`].
    pub date_folder: String,

    /// Invoice series, or [`NO_SERIES`].
    pub series: String,

    /// Code in `DD.DD.DDD` form, or [`NO_CODE`].
    pub code: String,
}

impl ClassificationKey {
    /// Build a key, substituting sentinels for missing parts.
    pub fn new(date_folder: Option<String>, series: Option<String>, code: Option<String>) -> Self {
        Self {
            date_folder: date_folder.unwrap_or_else(|| NO_DATE.to_string()),
            series: series.unwrap_or_else(|| NO_SERIES.to_string()),
            code: code.unwrap_or_else(|| NO_CODE.to_string()),
        }
    }

    /// Key made only of sentinels.
    pub fn unclassified() -> Self {
        Self::new(None, None, None)
    }
}

impl std::fmt::Display for ClassificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.date_folder, self.series, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_fill_missing_parts() {
        let key = ClassificationKey::new(Some("2024-05-01".into()), None, None);

        assert_eq!(key.date_folder, "2024-05-01");
        assert_eq!(key.series, NO_SERIES);
        assert_eq!(key.code, NO_CODE);
    }

    #[test]
    fn test_unclassified() {
        let key = ClassificationKey::unclassified();
        assert_eq!(key.to_string(), "SIN_FECHA / SIN_SERIE / SIN_CODIGO");
    }
}
