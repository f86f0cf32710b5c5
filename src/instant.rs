//! The instant type used for range bounds.
//!
//! An [`Instant`] is a UTC point in time at one-second precision on the
//! proleptic Gregorian calendar. Years use astronomical numbering (year 0
//! exists, year -1 is 2 BCE) and are not limited to chrono's supported range.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Largest year magnitude accepted anywhere in the crate.
///
/// Keeps day arithmetic comfortably inside `i64`.
pub const MAX_YEAR_MAGNITUDE: i64 = 999_999_999_999;

const SECONDS_PER_DAY: i64 = 86_400;
const MINUTES_PER_DAY: i64 = 1_440;

/// A UTC point in time with an explicit (possibly negative) year.
///
/// Field order matters: the derived `Ord` compares year, month, day, hour,
/// minute, second in that order, which is chronological order.
///
/// # Examples
///
/// ```
/// use sparql_temporal::Instant;
///
/// let bce = Instant::from_ymd(-600, 1, 1).unwrap();
/// let ce = Instant::from_ymd(600, 1, 1).unwrap();
/// assert!(bce < ce);
/// assert_eq!(bce.to_string(), "-0600-01-01T00:00:00Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instant {
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl Instant {
    /// Creates an instant, checking every field against the calendar.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInstant` if any field is out of range
    /// (including a day past the end of its month).
    pub fn new(
        year: i64,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, ValidationError> {
        if year.abs() > MAX_YEAR_MAGNITUDE {
            return Err(invalid(format!("year {year} exceeds ±{MAX_YEAR_MAGNITUDE}")));
        }
        if !(1..=12).contains(&month) {
            return Err(invalid(format!("month {month} is not in 1..=12")));
        }
        let last_day = days_in_month(year, month);
        if day == 0 || day > last_day {
            return Err(invalid(format!(
                "day {day} is not in 1..={last_day} for {year}-{month:02}"
            )));
        }
        if hour > 23 {
            return Err(invalid(format!("hour {hour} is not in 0..=23")));
        }
        if minute > 59 {
            return Err(invalid(format!("minute {minute} is not in 0..=59")));
        }
        if second > 59 {
            return Err(invalid(format!("second {second} is not in 0..=59")));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Creates an instant at midnight of the given calendar day.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInstant` if the date does not exist.
    pub fn from_ymd(year: i64, month: u8, day: u8) -> Result<Self, ValidationError> {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Astronomical year (0 is 1 BCE).
    pub const fn year(&self) -> i64 {
        self.year
    }

    /// Month of the year, 1-based.
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Day of the month, 1-based.
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Hour, `0..=23`.
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute, `0..=59`.
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Second, `0..=59`.
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// True for years before year 0.
    pub const fn is_negative(&self) -> bool {
        self.year < 0
    }

    /// `00:00:00` of the same calendar day.
    #[must_use]
    pub const fn start_of_day(&self) -> Self {
        Self {
            hour: 0,
            minute: 0,
            second: 0,
            ..*self
        }
    }

    /// `23:59:59` of the same calendar day.
    ///
    /// Sub-second precision is never carried, so this is the last
    /// representable instant of the day and never rolls into the next one.
    #[must_use]
    pub const fn end_of_day(&self) -> Self {
        Self {
            hour: 23,
            minute: 59,
            second: 59,
            ..*self
        }
    }

    /// January 1st, `00:00:01` of the same year.
    ///
    /// The lower year bound sits one second past midnight; stored ranges
    /// depend on this exact value.
    #[must_use]
    pub const fn start_of_year(&self) -> Self {
        Self {
            year: self.year,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 1,
        }
    }

    /// December 31st, `23:59:59` of the same year.
    #[must_use]
    pub const fn end_of_year(&self) -> Self {
        Self {
            year: self.year,
            month: 12,
            day: 31,
            hour: 23,
            minute: 59,
            second: 59,
        }
    }

    /// Days elapsed since 1970-01-01 (negative before it).
    pub fn days_since_epoch(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    /// Seconds elapsed since 1970-01-01T00:00:00Z (negative before it).
    ///
    /// Returns `None` for years too far out for the count to fit in an `i64`.
    pub fn seconds_since_epoch(&self) -> Option<i64> {
        self.days_since_epoch()
            .checked_mul(SECONDS_PER_DAY)?
            .checked_add(i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second))
    }

    /// Rebuilds an instant from a count of seconds since the epoch.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInstant` if the resulting year is out
    /// of range.
    pub fn from_seconds_since_epoch(seconds: i64) -> Result<Self, ValidationError> {
        let days = seconds.div_euclid(SECONDS_PER_DAY);
        let rem = seconds.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (hour, minute, second) = ((rem / 3600) as u8, (rem % 3600 / 60) as u8, (rem % 60) as u8);
        Self::new(year, month, day, hour, minute, second)
    }

    /// Shifts the instant by a signed number of minutes, carrying across day,
    /// month and year boundaries.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInstant` if the result is out of range.
    pub fn shifted_by_minutes(&self, minutes: i64) -> Result<Self, ValidationError> {
        // Whole days are carried apart from the minute of day; no seconds count.
        let overflow = || invalid(format!("shifting {self} by {minutes} minutes overflows"));
        let minute_of_day = (i64::from(self.hour) * 60 + i64::from(self.minute))
            .checked_add(minutes)
            .ok_or_else(overflow)?;
        let days = self
            .days_since_epoch()
            .checked_add(minute_of_day.div_euclid(MINUTES_PER_DAY))
            .ok_or_else(overflow)?;
        let minute_of_day = minute_of_day.rem_euclid(MINUTES_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (hour, minute) = ((minute_of_day / 60) as u8, (minute_of_day % 60) as u8);
        Self::new(year, month, day, hour, minute, self.second)
    }
}

fn invalid(reason: String) -> ValidationError {
    ValidationError::InvalidInstant { reason }
}

/// Leap year rule of the proleptic Gregorian calendar.
pub const fn is_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// Number of days in `month` (1-based) of `year`; 0 for an invalid month.
pub const fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

// Howard Hinnant's days_from_civil, generalized to i64 years.
fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (i64::from(month) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month as u8, day as u8)
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_instant(self))
    }
}

impl Serialize for Instant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&crate::format::format_instant(self))
    }
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        crate::parse::DateParser::default()
            .try_parse(&text)
            .map_err(serde::de::Error::custom)
    }
}

impl From<DateTime<Utc>> for Instant {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            year: i64::from(value.year()),
            month: value.month() as u8,
            day: value.day() as u8,
            hour: value.hour() as u8,
            minute: value.minute() as u8,
            // Leap seconds are reported by chrono as 59 + nanos; keep 59.
            second: value.second().min(59) as u8,
        }
    }
}

impl From<NaiveDate> for Instant {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: NaiveDate) -> Self {
        Self {
            year: i64::from(value.year()),
            month: value.month() as u8,
            day: value.day() as u8,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl TryFrom<Instant> for DateTime<Utc> {
    type Error = ValidationError;

    fn try_from(value: Instant) -> Result<Self, Self::Error> {
        let year = i32::try_from(value.year)
            .map_err(|_| invalid(format!("year {} is outside chrono's range", value.year)))?;
        NaiveDate::from_ymd_opt(year, u32::from(value.month), u32::from(value.day))
            .and_then(|date| {
                date.and_hms_opt(
                    u32::from(value.hour),
                    u32::from(value.minute),
                    u32::from(value.second),
                )
            })
            .map(|naive| naive.and_utc())
            .ok_or_else(|| invalid(format!("{value} is outside chrono's range")))
    }
}
