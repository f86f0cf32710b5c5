//! Widget configuration.
//!
//! One [`TemporalConfig`] is fixed per widget instance. It can be built in
//! code or loaded from JSON; every field has a default.
//!
//! ```json
//! {
//!   "granularity": "year",
//!   "day_label": "day_month_year",
//!   "slash_dates": "day_first",
//!   "phrases": { "from": "from", "to": "to", "from_only": "after", "to_only": "before" }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::label::{DayLabelFormat, LabelPhrases};
use crate::parse::{DateParser, SlashDateOrder};
use crate::range::{Granularity, RangeNormalizer};

/// Configuration of a temporal widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Day or year precision.
    pub granularity: Granularity,
    /// How calendar days are written in labels.
    pub day_label: DayLabelFormat,
    /// How `a/b/yyyy` input is read.
    pub slash_dates: SlashDateOrder,
    /// Locale phrases for labels.
    pub phrases: LabelPhrases,
}

impl TemporalConfig {
    /// Default configuration at `granularity`.
    #[must_use]
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the JSON is malformed or names an
    /// unknown option.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: format!("temporal config: {e}"),
        })
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Parse` if its content is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Serializes the configuration to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: format!("serialize temporal config: {e}"),
        })
    }

    /// Parser reading raw text under this configuration.
    pub const fn parser(&self) -> DateParser {
        DateParser::new(self.slash_dates)
    }

    /// Normalizer producing ranges under this configuration.
    pub fn normalizer(&self) -> RangeNormalizer {
        RangeNormalizer::new(self.granularity)
            .with_parser(self.parser())
            .with_day_label(self.day_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TemporalConfig::default();
        assert_eq!(config.granularity, Granularity::Day);
        assert_eq!(config.day_label, DayLabelFormat::Iso);
        assert_eq!(config.slash_dates, SlashDateOrder::DayFirst);
        assert_eq!(config.phrases, LabelPhrases::default());
    }

    #[test]
    fn test_from_json_partial() {
        let config = TemporalConfig::from_json(r#"{"granularity": "year"}"#).unwrap();
        assert_eq!(config.granularity, Granularity::Year);
        assert_eq!(config.day_label, DayLabelFormat::Iso);
    }

    #[test]
    fn test_from_json_full() {
        let config = TemporalConfig::from_json(
            r#"{
                "granularity": "day",
                "day_label": "month_day_year",
                "slash_dates": "month_first",
                "phrases": {"from": "du", "to": "au", "from_only": "après", "to_only": "avant"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.day_label, DayLabelFormat::MonthDayYear);
        assert_eq!(config.slash_dates, SlashDateOrder::MonthFirst);
        assert_eq!(config.phrases.to_only, "avant");
    }

    #[test]
    fn test_from_json_unknown_granularity() {
        let err = TemporalConfig::from_json(r#"{"granularity": "month"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TemporalConfig::new(Granularity::Year);
        let json = config.to_json_pretty().unwrap();
        assert_eq!(TemporalConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"granularity": "year", "day_label": "day_month_year"}}"#).unwrap();

        let config = TemporalConfig::from_path(file.path()).unwrap();
        assert_eq!(config.granularity, Granularity::Year);
        assert_eq!(config.day_label, DayLabelFormat::DayMonthYear);
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = TemporalConfig::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_normalizer_follows_config() {
        let config = TemporalConfig {
            granularity: Granularity::Day,
            day_label: DayLabelFormat::DayMonthYear,
            slash_dates: SlashDateOrder::DayFirst,
            phrases: LabelPhrases::default(),
        };
        let range = config
            .normalizer()
            .normalize(Some("01/03/2020"), None)
            .unwrap();
        assert_eq!(range.start_label(), "01/03/2020");
        assert_eq!(range.start_literal().as_deref(), Some("2020-03-01T00:00:00Z"));
    }
}
