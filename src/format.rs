//! `xsd:dateTime` literal formatting.
//!
//! Instants are written as `YYYY-MM-DDTHH:MM:SSZ`. The year magnitude is
//! zero-padded to at least four digits and never beyond what it needs, and a
//! negative year gets exactly one leading `-`:
//!
//! | year   | literal                 |
//! |--------|-------------------------|
//! | 2021   | `2021-…`                |
//! | 600    | `0600-…`                |
//! | 12000  | `12000-…`               |
//! | -600   | `-0600-…`               |
//!
//! Generic ISO-8601 writers expand negative years to six digits (`-000600`),
//! which SPARQL endpoints reject or misread as a different year.

use crate::instant::Instant;
use crate::pattern::{Iri, Literal};

/// Datatype IRI of the produced literals.
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// Formats an instant as an `xsd:dateTime` lexical form.
///
/// # Examples
///
/// ```
/// use sparql_temporal::{format_instant, Instant};
///
/// let instant = Instant::new(-600, 12, 31, 23, 59, 59).unwrap();
/// assert_eq!(format_instant(&instant), "-0600-12-31T23:59:59Z");
/// ```
pub fn format_instant(instant: &Instant) -> String {
    let sign = if instant.is_negative() { "-" } else { "" };
    format!(
        "{sign}{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        instant.year().unsigned_abs(),
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute(),
        instant.second(),
    )
}

/// Formats an optional bound; `None` stays `None` (an open side).
pub fn format_optional(instant: Option<&Instant>) -> Option<String> {
    instant.map(format_instant)
}

/// Builds the typed `xsd:dateTime` literal for an instant.
pub fn date_time_literal(instant: &Instant) -> Literal {
    Literal::typed(format_instant(instant), Iri::xsd_date_time())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(y: i64, mo: u8, d: u8, h: u8, mi: u8, s: u8) -> Instant {
        Instant::new(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_modern_year() {
        assert_eq!(
            format_instant(&instant(2020, 3, 1, 0, 0, 0)),
            "2020-03-01T00:00:00Z"
        );
    }

    #[test]
    fn test_small_year_is_padded_to_four() {
        assert_eq!(
            format_instant(&instant(600, 1, 1, 0, 0, 1)),
            "0600-01-01T00:00:01Z"
        );
        assert_eq!(format_instant(&instant(7, 2, 3, 4, 5, 6)), "0007-02-03T04:05:06Z");
        assert_eq!(format_instant(&instant(0, 1, 1, 0, 0, 0)), "0000-01-01T00:00:00Z");
    }

    #[test]
    fn test_large_year_is_not_repadded() {
        assert_eq!(
            format_instant(&instant(12_000, 12, 31, 23, 59, 59)),
            "12000-12-31T23:59:59Z"
        );
        assert_eq!(
            format_instant(&instant(-12_000, 1, 1, 0, 0, 1)),
            "-12000-01-01T00:00:01Z"
        );
    }

    #[test]
    fn test_negative_year_uses_four_digits_not_six() {
        assert_eq!(
            format_instant(&instant(-600, 12, 31, 23, 59, 59)),
            "-0600-12-31T23:59:59Z"
        );
        assert_eq!(
            format_instant(&instant(-7, 1, 1, 0, 0, 1)),
            "-0007-01-01T00:00:01Z"
        );
    }

    #[test]
    fn test_every_small_negative_year_has_four_magnitude_digits() {
        for year in -999..=-1 {
            let text = format_instant(&instant(year, 1, 1, 0, 0, 1));
            let (magnitude, rest) = text[1..].split_once('-').unwrap();
            assert!(text.starts_with('-'), "{text}");
            assert!(!text[1..].starts_with('-'), "{text}");
            assert_eq!(magnitude.len(), 4, "{text}");
            assert_eq!(magnitude.parse::<i64>().unwrap(), -year);
            assert_eq!(rest, "01-01T00:00:01Z");
        }
    }

    #[test]
    fn test_fields_roundtrip_through_numeric_parse() {
        let samples = [
            instant(-4713, 11, 24, 12, 0, 0),
            instant(-600, 2, 28, 1, 2, 3),
            instant(1, 1, 1, 0, 0, 0),
            instant(1582, 10, 15, 8, 30, 59),
            instant(2024, 2, 29, 23, 59, 59),
            instant(123_456, 6, 15, 9, 9, 9),
        ];
        for original in samples {
            let text = format_instant(&original);
            let (negative, body) = match text.strip_prefix('-') {
                Some(body) => (true, body),
                None => (false, text.as_str()),
            };
            let body = body.trim_end_matches('Z');
            let (date, time) = body.split_once('T').unwrap();
            let date: Vec<i64> = date.split('-').map(|p| p.parse().unwrap()).collect();
            let time: Vec<u8> = time.split(':').map(|p| p.parse().unwrap()).collect();
            let year = if negative { -date[0] } else { date[0] };
            assert_eq!(year, original.year());
            assert_eq!(date[1], i64::from(original.month()));
            assert_eq!(date[2], i64::from(original.day()));
            assert_eq!(time, vec![original.hour(), original.minute(), original.second()]);
        }
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(None), None);
        assert_eq!(
            format_optional(Some(&instant(2021, 1, 1, 0, 0, 1))).as_deref(),
            Some("2021-01-01T00:00:01Z")
        );
    }

    #[test]
    fn test_date_time_literal() {
        let literal = date_time_literal(&instant(-600, 1, 1, 0, 0, 1));
        assert_eq!(literal.lexical(), "-0600-01-01T00:00:01Z");
        assert_eq!(literal.datatype().as_str(), XSD_DATE_TIME);
        assert_eq!(
            literal.to_string(),
            "\"-0600-01-01T00:00:01Z\"^^<http://www.w3.org/2001/XMLSchema#dateTime>"
        );
    }
}
