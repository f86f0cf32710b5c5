//! Human-readable labels for accepted ranges.
//!
//! The phrases are supplied by the host (they are locale strings); this
//! module only decides which ones to use and how side labels are written.

use serde::{Deserialize, Serialize};

use crate::instant::Instant;
use crate::range::NormalizedRange;

/// Locale phrases used to build a range label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPhrases {
    /// Leads a label with both sides (`from 2000 to 2010`).
    pub from: String,
    /// Joins both sides (`from 2000 to 2010`).
    pub to: String,
    /// Leads a label with only a start side (`from 2000`).
    pub from_only: String,
    /// Leads a label with only a stop side (`until 2010`).
    pub to_only: String,
}

impl Default for LabelPhrases {
    fn default() -> Self {
        Self {
            from: "from".to_string(),
            to: "to".to_string(),
            from_only: "from".to_string(),
            to_only: "until".to_string(),
        }
    }
}

impl LabelPhrases {
    /// Labels `range` with these phrases.
    pub fn label(&self, range: &NormalizedRange) -> String {
        label(range, &self.from, &self.to, &self.from_only, &self.to_only)
    }
}

/// How a calendar day is written in a day-granularity label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayLabelFormat {
    /// `2020-03-01`
    #[default]
    Iso,
    /// `01/03/2020`
    DayMonthYear,
    /// `03/01/2020`
    MonthDayYear,
}

impl DayLabelFormat {
    /// Writes the calendar day of `instant`.
    pub fn render(self, instant: &Instant) -> String {
        let (year, month, day) = (instant.year(), instant.month(), instant.day());
        match self {
            Self::Iso => {
                let sign = if year < 0 { "-" } else { "" };
                format!("{sign}{:04}-{month:02}-{day:02}", year.unsigned_abs())
            }
            Self::DayMonthYear => format!("{day:02}/{month:02}/{year}"),
            Self::MonthDayYear => format!("{month:02}/{day:02}/{year}"),
        }
    }
}

/// Builds the display label of a range from its side labels.
///
/// Both sides: `"{from} {start} {to} {stop}"`. One side:
/// `"{from_only} {start}"` or `"{to_only} {stop}"`. No sides: empty.
pub fn label(
    range: &NormalizedRange,
    from_text: &str,
    to_text: &str,
    from_only_text: &str,
    to_only_text: &str,
) -> String {
    let start = range.start_label();
    let end = range.end_label();
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{from_text} {start} {to_text} {end}"),
        (false, true) => format!("{from_only_text} {start}"),
        (true, false) => format!("{to_only_text} {end}"),
        (true, true) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: Option<Instant>, stop: Option<Instant>, sl: &str, el: &str) -> NormalizedRange {
        NormalizedRange::new(start, stop, sl, el).unwrap()
    }

    #[test]
    fn test_label_both_sides() {
        let r = range(
            Some(Instant::from_ymd(2000, 1, 1).unwrap()),
            Some(Instant::from_ymd(2010, 1, 1).unwrap()),
            "2000",
            "2010",
        );
        assert_eq!(label(&r, "From", "to", "After", "Before"), "From 2000 to 2010");
        assert_eq!(LabelPhrases::default().label(&r), "from 2000 to 2010");
    }

    #[test]
    fn test_label_one_side() {
        let start_only = range(Some(Instant::from_ymd(2000, 1, 1).unwrap()), None, "2000", "");
        assert_eq!(label(&start_only, "From", "to", "After", "Before"), "After 2000");

        let stop_only = range(None, Some(Instant::from_ymd(-600, 1, 1).unwrap()), "", "-600");
        assert_eq!(label(&stop_only, "From", "to", "After", "Before"), "Before -600");
        assert_eq!(LabelPhrases::default().label(&stop_only), "until -600");
    }

    #[test]
    fn test_label_no_side_labels() {
        let r = range(Some(Instant::from_ymd(2000, 1, 1).unwrap()), None, "", "");
        assert_eq!(label(&r, "From", "to", "After", "Before"), "");
    }

    #[test]
    fn test_day_label_formats() {
        let day = Instant::new(2020, 3, 1, 13, 0, 0).unwrap();
        assert_eq!(DayLabelFormat::Iso.render(&day), "2020-03-01");
        assert_eq!(DayLabelFormat::DayMonthYear.render(&day), "01/03/2020");
        assert_eq!(DayLabelFormat::MonthDayYear.render(&day), "03/01/2020");

        let bce = Instant::from_ymd(-44, 3, 15).unwrap();
        assert_eq!(DayLabelFormat::Iso.render(&bce), "-0044-03-15");
        assert_eq!(DayLabelFormat::DayMonthYear.render(&bce), "15/03/-44");
    }

    #[test]
    fn test_phrases_deserialize_with_defaults() {
        let phrases: LabelPhrases = serde_json::from_str(r#"{"from": "de", "to": "à"}"#).unwrap();
        assert_eq!(phrases.from, "de");
        assert_eq!(phrases.to, "à");
        assert_eq!(phrases.to_only, "until");
    }
}
