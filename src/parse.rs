//! Raw date text parsing and validation.
//!
//! A string is a valid instant iff it matches one of the accepted textual
//! forms *and* names a date that exists on the calendar. The accepted forms
//! are:
//!
//! - ISO-like: `[+-]Y…`, `[+-]Y…-MM`, `[+-]Y…-MM-DD`, optionally followed by
//!   `THH:MM[:SS[.fff]]` and a `Z` or `±HH:MM` offset. The year may have any
//!   number of digits and a leading `-` denotes a negative year.
//! - Slash dates: `a/b/[+-]Y…`, read day-first or month-first.
//!
//! Missing components default to the start of the period (`2021` is
//! `2021-01-01T00:00:00Z`). Fractional seconds are truncated.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::instant::{Instant, MAX_YEAR_MAGNITUDE};

const ISO_PATTERN: &str = r"^(?P<sign>[+-])?(?P<year>\d+)(?:-(?P<month>\d{1,2})(?:-(?P<day>\d{1,2})(?:[T ](?P<hour>\d{2}):(?P<minute>\d{2})(?::(?P<second>\d{2})(?:[.,](?P<fraction>\d+))?)?(?P<offset>Z|z|(?P<offset_sign>[+-])(?P<offset_hour>\d{2}):?(?P<offset_minute>\d{2}))?)?)?)?$";

const SLASH_PATTERN: &str = r"^(?P<first>\d{1,2})/(?P<second>\d{1,2})/(?P<sign>[+-])?(?P<year>\d+)$";

static ISO_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static SLASH_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn grammar(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &'static str,
) -> Result<&'static Regex, ValidationError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| ValidationError::InvalidInstant {
            reason: format!("date grammar failed to compile: {e}"),
        })
}

/// How the two leading numbers of a slash date are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlashDateOrder {
    /// `dd/mm/yyyy`
    #[default]
    DayFirst,
    /// `mm/dd/yyyy`
    MonthFirst,
}

/// Parses raw date text into [`Instant`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateParser {
    slash_order: SlashDateOrder,
}

impl DateParser {
    /// Creates a parser reading slash dates in `slash_order`.
    #[must_use]
    pub const fn new(slash_order: SlashDateOrder) -> Self {
        Self { slash_order }
    }

    /// How this parser reads slash dates.
    pub const fn slash_order(&self) -> SlashDateOrder {
        self.slash_order
    }

    /// Returns true if `text` denotes an existing calendar instant.
    ///
    /// Empty (or all-whitespace) text is not valid.
    pub fn is_valid(&self, text: &str) -> bool {
        self.parse(text).is_some()
    }

    /// Parses `text`, returning `None` for anything that is not a date.
    pub fn parse(&self, text: &str) -> Option<Instant> {
        self.try_parse(text).ok()
    }

    /// Parses `text`, explaining why it was rejected.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInstant` if the text is empty, does
    /// not match an accepted form, or names a date that does not exist.
    pub fn try_parse(&self, text: &str) -> Result<Instant, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::InvalidInstant {
                reason: "empty text".to_string(),
            });
        }

        if let Some(caps) = grammar(&ISO_REGEX, ISO_PATTERN)?.captures(text) {
            return parse_iso(&caps);
        }
        if let Some(caps) = grammar(&SLASH_REGEX, SLASH_PATTERN)?.captures(text) {
            return self.parse_slash(&caps);
        }

        Err(ValidationError::InvalidInstant {
            reason: format!("'{text}' is not a recognised date"),
        })
    }

    fn parse_slash(&self, caps: &Captures<'_>) -> Result<Instant, ValidationError> {
        let year = signed_year(caps)?;
        let first = number_u8(caps, "first")?.unwrap_or(1);
        let second = number_u8(caps, "second")?.unwrap_or(1);
        let (day, month) = match self.slash_order {
            SlashDateOrder::DayFirst => (first, second),
            SlashDateOrder::MonthFirst => (second, first),
        };
        Instant::from_ymd(year, month, day)
    }
}

/// Returns true if `text` parses to a calendar instant under the default
/// parser.
pub fn is_valid_instant(text: &str) -> bool {
    DateParser::default().is_valid(text)
}

/// Parses `text` under the default parser.
pub fn parse_instant(text: &str) -> Option<Instant> {
    DateParser::default().parse(text)
}

fn parse_iso(caps: &Captures<'_>) -> Result<Instant, ValidationError> {
    let year = signed_year(caps)?;
    let month = number_u8(caps, "month")?.unwrap_or(1);
    let day = number_u8(caps, "day")?.unwrap_or(1);
    let hour = number_u8(caps, "hour")?.unwrap_or(0);
    let minute = number_u8(caps, "minute")?.unwrap_or(0);
    // Any fractional part is dropped, never rounded up.
    let second = number_u8(caps, "second")?.unwrap_or(0);

    let local = Instant::new(year, month, day, hour, minute, second)?;

    if caps.name("offset_sign").is_none() {
        return Ok(local);
    }
    let offset_hour = i64::from(number_u8(caps, "offset_hour")?.unwrap_or(0));
    let offset_minute = i64::from(number_u8(caps, "offset_minute")?.unwrap_or(0));
    if offset_hour > 23 || offset_minute > 59 {
        return Err(ValidationError::InvalidInstant {
            reason: format!("offset {offset_hour:02}:{offset_minute:02} is out of range"),
        });
    }
    let mut offset = offset_hour * 60 + offset_minute;
    if caps.name("offset_sign").map(|m| m.as_str()) == Some("-") {
        offset = -offset;
    }
    local.shifted_by_minutes(-offset)
}

fn signed_year(caps: &Captures<'_>) -> Result<i64, ValidationError> {
    let digits = caps.name("year").map_or("", |m| m.as_str());
    let magnitude: i64 = digits
        .parse()
        .ok()
        .filter(|y: &i64| *y <= MAX_YEAR_MAGNITUDE)
        .ok_or_else(|| ValidationError::InvalidInstant {
            reason: format!("year '{digits}' is out of range"),
        })?;
    if caps.name("sign").map(|m| m.as_str()) == Some("-") {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

fn number_u8(caps: &Captures<'_>, name: &str) -> Result<Option<u8>, ValidationError> {
    caps.name(name)
        .map(|m| {
            m.as_str()
                .parse::<u8>()
                .map_err(|e| ValidationError::InvalidInstant {
                    reason: format!("{name} '{}': {e}", m.as_str()),
                })
        })
        .transpose()
}
