//! Normalized date ranges.
//!
//! A [`NormalizedRange`] is an inclusive `[start, stop]` window at day or year
//! granularity, either side of which may be open. It is produced once from raw
//! user text by a [`RangeNormalizer`] and never changes afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, ValidationError};
use crate::format::format_optional;
use crate::instant::Instant;
use crate::label::DayLabelFormat;
use crate::parse::DateParser;

/// Precision at which user dates are normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Whole calendar days.
    #[default]
    Day,
    /// Whole calendar years.
    Year,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => f.write_str("day"),
            Self::Year => f.write_str("year"),
        }
    }
}

impl FromStr for Granularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "year" => Ok(Self::Year),
            _ => Err(ConfigError::UnknownGranularity {
                value: s.to_string(),
            }),
        }
    }
}

/// The raw text pair typed by the user. Empty text means "no bound".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInstantInput {
    /// Raw start text; `None` or empty means open.
    pub start: Option<String>,
    /// Raw stop text; `None` or empty means open.
    pub stop: Option<String>,
}

impl RawInstantInput {
    /// Input with both sides given as text.
    #[must_use]
    pub fn new(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            stop: Some(stop.into()),
        }
    }
}

/// An inclusive, validated date range.
///
/// Invariants: at least one side is present, and `start <= stop` when both
/// are. The side labels reflect the precision the user typed and are used
/// for display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeRecord")]
pub struct NormalizedRange {
    start: Option<Instant>,
    stop: Option<Instant>,
    start_label: String,
    end_label: String,
}

#[derive(Deserialize)]
struct RangeRecord {
    start: Option<Instant>,
    stop: Option<Instant>,
    #[serde(default)]
    start_label: String,
    #[serde(default)]
    end_label: String,
}

impl TryFrom<RangeRecord> for NormalizedRange {
    type Error = ValidationError;

    fn try_from(value: RangeRecord) -> Result<Self, Self::Error> {
        Self::new(value.start, value.stop, value.start_label, value.end_label)
    }
}

impl NormalizedRange {
    /// Builds a range from already-normalized bounds.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDate` if both sides are open and
    /// `ValidationError::RangeOrder` if `start > stop`.
    pub fn new(
        start: Option<Instant>,
        stop: Option<Instant>,
        start_label: impl Into<String>,
        end_label: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        match (start, stop) {
            (None, None) => {
                return Err(ValidationError::InvalidDate {
                    start: String::new(),
                    stop: String::new(),
                })
            }
            (Some(s), Some(e)) if s > e => {
                return Err(ValidationError::RangeOrder {
                    start: s.to_string(),
                    stop: e.to_string(),
                })
            }
            _ => {}
        }
        Ok(Self {
            start,
            stop,
            start_label: start_label.into(),
            end_label: end_label.into(),
        })
    }

    /// Inclusive lower bound; `None` means unbounded below.
    pub const fn start(&self) -> Option<&Instant> {
        self.start.as_ref()
    }

    /// Inclusive upper bound; `None` means unbounded above.
    pub const fn stop(&self) -> Option<&Instant> {
        self.stop.as_ref()
    }

    /// Display label of the start side; empty when open.
    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    /// Display label of the stop side; empty when open.
    pub fn end_label(&self) -> &str {
        &self.end_label
    }

    /// Formatted lower bound literal, if any.
    pub fn start_literal(&self) -> Option<String> {
        format_optional(self.start())
    }

    /// Formatted upper bound literal, if any.
    pub fn stop_literal(&self) -> Option<String> {
        format_optional(self.stop())
    }

    /// Identity of the value among accepted values:
    /// `"<start> - <stop>"`, with `null` for an open side.
    pub fn key(&self) -> String {
        format!(
            "{} - {}",
            self.start_literal().as_deref().unwrap_or("null"),
            self.stop_literal().as_deref().unwrap_or("null"),
        )
    }

    /// True if `instant` falls inside the range (bounds inclusive).
    pub fn contains(&self, instant: &Instant) -> bool {
        self.start.map_or(true, |s| s <= *instant) && self.stop.map_or(true, |e| *instant <= e)
    }
}

impl fmt::Display for NormalizedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.start, &self.stop) {
            (Some(s), Some(e)) => write!(f, "[{s} → {e}]"),
            (Some(s), None) => write!(f, "[{s} → ∞)"),
            (None, Some(e)) => write!(f, "(∞ → {e}]"),
            (None, None) => f.write_str("(∞ → ∞)"),
        }
    }
}

/// Turns raw user text into [`NormalizedRange`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeNormalizer {
    granularity: Granularity,
    parser: DateParser,
    day_label: DayLabelFormat,
}

impl RangeNormalizer {
    /// Normalizer at `granularity` with default parsing and labels.
    #[must_use]
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }

    /// Use `parser` to read raw text.
    #[must_use]
    pub const fn with_parser(mut self, parser: DateParser) -> Self {
        self.parser = parser;
        self
    }

    /// Use `format` for day-granularity labels.
    #[must_use]
    pub const fn with_day_label(mut self, format: DayLabelFormat) -> Self {
        self.day_label = format;
        self
    }

    /// Configured granularity.
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Validates and normalizes a raw start/stop pair.
    ///
    /// A side that is absent, empty, or not a date becomes an open bound with
    /// an empty label.
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidDate` if neither side is a date.
    /// - `ValidationError::RangeOrder` if both are and start is after stop.
    pub fn normalize(
        &self,
        raw_start: Option<&str>,
        raw_stop: Option<&str>,
    ) -> Result<NormalizedRange, ValidationError> {
        let start = self.read_side("start", raw_start);
        let stop = self.read_side("stop", raw_stop);

        match (start, stop) {
            (None, None) => {
                return Err(ValidationError::InvalidDate {
                    start: raw_start.unwrap_or_default().to_string(),
                    stop: raw_stop.unwrap_or_default().to_string(),
                });
            }
            (Some(s), Some(e)) if s > e => {
                return Err(ValidationError::RangeOrder {
                    start: s.to_string(),
                    stop: e.to_string(),
                });
            }
            _ => {}
        }

        let range = match self.granularity {
            Granularity::Day => NormalizedRange {
                start: start.map(|s| s.start_of_day()),
                stop: stop.map(|e| e.end_of_day()),
                start_label: start.map(|s| self.day_label.render(&s)).unwrap_or_default(),
                end_label: stop.map(|e| self.day_label.render(&e)).unwrap_or_default(),
            },
            Granularity::Year => NormalizedRange {
                start: start.map(|s| s.start_of_year()),
                stop: stop.map(|e| e.end_of_year()),
                start_label: start.map(|s| s.year().to_string()).unwrap_or_default(),
                end_label: stop.map(|e| e.year().to_string()).unwrap_or_default(),
            },
        };

        debug!(
            granularity = %self.granularity,
            start = ?range.start_literal(),
            stop = ?range.stop_literal(),
            "normalized date range"
        );
        Ok(range)
    }

    /// Same as [`RangeNormalizer::normalize`] over a [`RawInstantInput`].
    ///
    /// # Errors
    ///
    /// See [`RangeNormalizer::normalize`].
    pub fn normalize_input(&self, input: &RawInstantInput) -> Result<NormalizedRange, ValidationError> {
        self.normalize(input.start.as_deref(), input.stop.as_deref())
    }

    fn read_side(&self, side: &'static str, raw: Option<&str>) -> Option<Instant> {
        let text = raw.map(str::trim).filter(|t| !t.is_empty())?;
        match self.parser.try_parse(text) {
            Ok(instant) => Some(instant),
            Err(e) => {
                warn!(side, text, error = %e, "ignoring unparseable date text");
                None
            }
        }
    }
}

/// Normalizes a raw start/stop pair with the default parser and labels.
///
/// # Errors
///
/// See [`RangeNormalizer::normalize`].
pub fn normalize(
    raw_start: Option<&str>,
    raw_stop: Option<&str>,
    granularity: Granularity,
) -> Result<NormalizedRange, ValidationError> {
    RangeNormalizer::new(granularity).normalize(raw_start, raw_stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::SlashDateOrder;

    fn instant(y: i64, mo: u8, d: u8, h: u8, mi: u8, s: u8) -> Instant {
        Instant::new(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("day".parse::<Granularity>().unwrap(), Granularity::Day);
        assert_eq!(" YEAR ".parse::<Granularity>().unwrap(), Granularity::Year);
        assert!("month".parse::<Granularity>().is_err());
        assert_eq!(Granularity::Year.to_string(), "year");
    }

    #[test]
    fn test_day_start_only() {
        let range = normalize(Some("2020-03-01"), Some(""), Granularity::Day).unwrap();
        assert_eq!(range.start(), Some(&instant(2020, 3, 1, 0, 0, 0)));
        assert_eq!(range.stop(), None);
        assert_eq!(range.start_label(), "2020-03-01");
        assert_eq!(range.end_label(), "");
    }

    #[test]
    fn test_day_bounds_are_truncated() {
        let range = normalize(
            Some("2020-03-01T15:45:10Z"),
            Some("2020-03-05T00:00:00.999Z"),
            Granularity::Day,
        )
        .unwrap();
        assert_eq!(range.start(), Some(&instant(2020, 3, 1, 0, 0, 0)));
        assert_eq!(range.stop(), Some(&instant(2020, 3, 5, 23, 59, 59)));
    }

    #[test]
    fn test_day_stop_is_always_end_of_day() {
        for day in 1..=28 {
            let text = format!("1999-02-{day:02}");
            let range = normalize(Some("1999-01-01"), Some(&text), Granularity::Day).unwrap();
            let stop = range.stop().unwrap();
            assert_eq!((stop.hour(), stop.minute(), stop.second()), (23, 59, 59));
            assert_eq!(stop.day(), day);
        }
    }

    #[test]
    fn test_year_bounds() {
        let range = normalize(Some("-600"), Some("-600"), Granularity::Year).unwrap();
        assert_eq!(range.start(), Some(&instant(-600, 1, 1, 0, 0, 1)));
        assert_eq!(range.stop(), Some(&instant(-600, 12, 31, 23, 59, 59)));
        assert_eq!(range.start_label(), "-600");
        assert_eq!(range.end_label(), "-600");
        assert_eq!(range.start_literal().as_deref(), Some("-0600-01-01T00:00:01Z"));
        assert_eq!(range.stop_literal().as_deref(), Some("-0600-12-31T23:59:59Z"));
    }

    #[test]
    fn test_year_bounds_from_full_dates() {
        let range = normalize(Some("1999-06-15"), Some("2003-02-01"), Granularity::Year).unwrap();
        assert_eq!(range.start(), Some(&instant(1999, 1, 1, 0, 0, 1)));
        assert_eq!(range.stop(), Some(&instant(2003, 12, 31, 23, 59, 59)));
        assert_eq!(range.start_label(), "1999");
        assert_eq!(range.end_label(), "2003");
    }

    #[test]
    fn test_start_after_stop_is_rejected() {
        let err = normalize(Some("2021-05-05"), Some("2019-01-01"), Granularity::Day).unwrap_err();
        assert!(matches!(err, ValidationError::RangeOrder { .. }));

        // Compared at the precision typed, before widening to whole years.
        let err = normalize(Some("2021-06-01"), Some("2021-01-01"), Granularity::Year).unwrap_err();
        assert!(matches!(err, ValidationError::RangeOrder { .. }));
    }

    #[test]
    fn test_nothing_valid_is_rejected() {
        let err = normalize(None, None, Granularity::Day).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { .. }));

        let err = normalize(Some(""), Some("  "), Granularity::Year).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { .. }));

        let err = normalize(Some("abc"), Some("2021-02-30"), Granularity::Day).unwrap_err();
        match err {
            ValidationError::InvalidDate { start, stop } => {
                assert_eq!(start, "abc");
                assert_eq!(stop, "2021-02-30");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn test_one_invalid_side_becomes_open() {
        let range = normalize(Some("garbage"), Some("2010"), Granularity::Year).unwrap();
        assert!(range.start().is_none());
        assert_eq!(range.start_label(), "");
        assert_eq!(range.stop(), Some(&instant(2010, 12, 31, 23, 59, 59)));
    }

    #[test]
    fn test_normalizer_with_slash_parser_and_labels() {
        let normalizer = RangeNormalizer::new(Granularity::Day)
            .with_parser(DateParser::new(SlashDateOrder::MonthFirst))
            .with_day_label(DayLabelFormat::MonthDayYear);
        let range = normalizer
            .normalize_input(&RawInstantInput::new("03/01/2020", "12/31/2020"))
            .unwrap();
        assert_eq!(range.start(), Some(&instant(2020, 3, 1, 0, 0, 0)));
        assert_eq!(range.stop(), Some(&instant(2020, 12, 31, 23, 59, 59)));
        assert_eq!(range.start_label(), "03/01/2020");
        assert_eq!(range.end_label(), "12/31/2020");
    }

    #[test]
    fn test_key() {
        let range = normalize(Some("2020-03-01"), None, Granularity::Day).unwrap();
        assert_eq!(range.key(), "2020-03-01T00:00:00Z - null");

        let range = normalize(Some("-600"), Some("-500"), Granularity::Year).unwrap();
        assert_eq!(range.key(), "-0600-01-01T00:00:01Z - -0500-12-31T23:59:59Z");
    }

    #[test]
    fn test_contains() {
        let range = normalize(Some("2000"), Some("2010"), Granularity::Year).unwrap();
        assert!(range.contains(&instant(2000, 1, 1, 0, 0, 1)));
        assert!(range.contains(&instant(2010, 12, 31, 23, 59, 59)));
        assert!(!range.contains(&instant(2000, 1, 1, 0, 0, 0)));
        assert!(!range.contains(&instant(2011, 1, 1, 0, 0, 0)));

        let open = normalize(None, Some("2010"), Granularity::Year).unwrap();
        assert!(open.contains(&instant(-9999, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_new_enforces_invariants() {
        assert!(NormalizedRange::new(None, None, "", "").is_err());
        let a = instant(2001, 1, 1, 0, 0, 0);
        let b = instant(2000, 1, 1, 0, 0, 0);
        assert!(matches!(
            NormalizedRange::new(Some(a), Some(b), "", ""),
            Err(ValidationError::RangeOrder { .. })
        ));
        assert!(NormalizedRange::new(Some(b), Some(a), "", "").is_ok());
        assert!(NormalizedRange::new(Some(a), Some(a), "", "").is_ok());
    }

    #[test]
    fn test_serialization_keeps_literals() {
        let range = normalize(Some("-600"), Some("-600"), Granularity::Year).unwrap();
        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(json["start"], "-0600-01-01T00:00:01Z");
        assert_eq!(json["stop"], "-0600-12-31T23:59:59Z");
        assert_eq!(json["start_label"], "-600");

        let decoded: NormalizedRange = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, range);
    }

    #[test]
    fn test_deserialization_rejects_broken_ranges() {
        let reversed = r#"{"start":"2010-01-01T00:00:00Z","stop":"2000-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<NormalizedRange>(reversed).is_err());

        let empty = r#"{"start":null,"stop":null}"#;
        assert!(serde_json::from_str::<NormalizedRange>(empty).is_err());
    }

    #[test]
    fn test_display() {
        let range = normalize(Some("2020-03-01"), None, Granularity::Day).unwrap();
        assert_eq!(range.to_string(), "[2020-03-01T00:00:00Z → ∞)");
    }
}
