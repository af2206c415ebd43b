//! Creation-date predicates.
//!
//! A [`DateSpec`] is either a single instant, matching candidates created on
//! the same calendar day, or a closed interval matching at full precision.
//! Inputs arrive in several shapes (hyphen-delimited strings, calendar
//! dates, timestamps with or without an offset) and are normalized into
//! [`Stamp`] endpoints.
//!
//! Endpoints without an explicit offset are *floating*: they borrow the
//! timezone of the creation timestamp they are compared against, rather
//! than assuming any fixed default.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Stamp
// ---------------------------------------------------------------------------

/// One normalized date endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// An absolute instant.
    Aware(DateTime<Utc>),
    /// A wall-clock time with no offset; resolved against the comparison
    /// target's timezone.
    Floating(NaiveDateTime),
}

impl Stamp {
    /// Parse a hyphen-delimited date string.
    ///
    /// The accepted format is `"Y-M-D[-H[-Mi[-S]]]"`: three to six integer
    /// components, year-month-day first. The result is floating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] with a description of what went wrong:
    /// wrong component count, a non-integer component, or components that
    /// name no real calendar date or time of day.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidDate {
            input: input.to_owned(),
            reason: reason.to_owned(),
        };

        let parts: Vec<&str> = input.split('-').collect();
        if !(3..=6).contains(&parts.len()) {
            return Err(invalid(
                "expected year-month-day with optional hour-minute-second",
            ));
        }

        let year: i32 = parts[0]
            .parse()
            .map_err(|_| invalid("year is not an integer"))?;
        let mut fields = [0u32; 5];
        for (i, part) in parts[1..].iter().enumerate() {
            fields[i] = part
                .parse()
                .map_err(|_| invalid("component is not an integer"))?;
        }
        let [month, day, hour, minute, second] = fields;

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| invalid("no such calendar date"))?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| invalid("no such time of day"))?;
        Ok(Self::Floating(date.and_time(time)))
    }

    /// The endpoint's calendar date in its own frame: the UTC date for an
    /// aware stamp, the wall-clock date for a floating one.
    #[must_use]
    pub fn local_date(&self) -> NaiveDate {
        match self {
            Self::Aware(dt) => dt.date_naive(),
            Self::Floating(naive) => naive.date(),
        }
    }

    /// Resolve this endpoint to an instant, borrowing `tz` when floating.
    ///
    /// Returns `None` when the wall-clock time does not exist in `tz`
    /// (spring-forward gap); such an endpoint can match nothing.
    fn resolve<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        match self {
            Self::Aware(dt) => Some(*dt),
            Self::Floating(naive) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// The instant used for interval-ordering checks, where floating
    /// endpoints are read as UTC (both endpoints of an all-floating interval
    /// shift together, so the ordering is frame-independent).
    fn ordering_key(&self) -> DateTime<Utc> {
        match self {
            Self::Aware(dt) => *dt,
            Self::Floating(naive) => naive.and_utc(),
        }
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aware(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Floating(naive) => write!(f, "{}", naive.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<NaiveDate> for Stamp {
    fn from(date: NaiveDate) -> Self {
        Self::Floating(date.and_time(NaiveTime::MIN))
    }
}

impl From<NaiveDateTime> for Stamp {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Floating(naive)
    }
}

impl From<DateTime<Utc>> for Stamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Aware(dt)
    }
}

// ---------------------------------------------------------------------------
// DateSpec
// ---------------------------------------------------------------------------

/// A creation-date predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSpec {
    /// Match candidates created on this endpoint's calendar day.
    On(Stamp),
    /// Match candidates created within the inclusive interval.
    Between(Stamp, Stamp),
}

impl DateSpec {
    /// A single-day predicate.
    pub fn on(stamp: impl Into<Stamp>) -> Self {
        Self::On(stamp.into())
    }

    /// Parse a single-day predicate from a date string (see [`Stamp::parse`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] when the string does not parse.
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self::On(Stamp::parse(input)?))
    }

    /// An inclusive interval predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDateRange`] unless `start` strictly precedes
    /// `end`; an empty or inverted interval is a contract violation, not a
    /// predicate that matches nothing.
    pub fn between(start: impl Into<Stamp>, end: impl Into<Stamp>) -> Result<Self> {
        let start = start.into();
        let end = end.into();
        if start.ordering_key() >= end.ordering_key() {
            return Err(Error::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self::Between(start, end))
    }

    /// Parse an inclusive interval predicate from two date strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] when either string does not parse, or
    /// [`Error::InvalidDateRange`] when the interval is empty or inverted.
    pub fn parse_range(start: &str, end: &str) -> Result<Self> {
        Self::between(Stamp::parse(start)?, Stamp::parse(end)?)
    }

    /// Whether a candidate created at `created` satisfies this predicate.
    ///
    /// Floating endpoints borrow `created`'s timezone. A single-day
    /// predicate compares calendar dates, each side in its own frame; an
    /// interval compares instants inclusively at full precision.
    #[must_use]
    pub fn matches<Tz: TimeZone>(&self, created: &DateTime<Tz>) -> bool {
        match self {
            Self::On(stamp) => created.date_naive() == stamp.local_date(),
            Self::Between(start, end) => {
                let tz = created.timezone();
                let (Some(start), Some(end)) = (start.resolve(&tz), end.resolve(&tz)) else {
                    return false;
                };
                let instant = created.with_timezone(&Utc);
                start <= instant && instant <= end
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_parse_date_only_string() {
        let stamp = Stamp::parse("2024-3-5").unwrap();
        assert_eq!(
            stamp.local_date(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn test_should_parse_full_datetime_string() {
        let stamp = Stamp::parse("2024-03-05-10-30-15").unwrap();
        let Stamp::Floating(naive) = stamp else {
            panic!("string inputs are floating");
        };
        assert_eq!(naive.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-05 10:30:15");
    }

    #[test]
    fn test_should_reject_too_few_components() {
        let err = Stamp::parse("2024-03").unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
    }

    #[test]
    fn test_should_reject_non_integer_component() {
        let err = Stamp::parse("2024-03-x").unwrap_err();
        let Error::InvalidDate { input, reason } = err else {
            panic!("expected InvalidDate");
        };
        assert_eq!(input, "2024-03-x");
        assert!(reason.contains("integer"));
    }

    #[test]
    fn test_should_reject_impossible_calendar_date() {
        assert!(Stamp::parse("2024-02-30").is_err());
        assert!(Stamp::parse("2024-13-01").is_err());
    }

    #[test]
    fn test_should_reject_impossible_time_of_day() {
        assert!(Stamp::parse("2024-03-05-25-0-0").is_err());
    }

    // -----------------------------------------------------------------------
    // Interval construction
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_reject_inverted_interval() {
        let err = DateSpec::parse_range("2024-12-31", "2024-01-01").unwrap_err();
        assert!(matches!(err, Error::InvalidDateRange { .. }));
    }

    #[test]
    fn test_should_reject_empty_interval() {
        assert!(DateSpec::parse_range("2024-06-15", "2024-06-15").is_err());
    }

    #[test]
    fn test_should_accept_ordered_interval() {
        assert!(DateSpec::parse_range("2024-01-01", "2024-12-31").is_ok());
    }

    // -----------------------------------------------------------------------
    // Matching
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_match_single_day_by_calendar_date() {
        let spec = DateSpec::parse("2024-03-05").unwrap();
        assert!(spec.matches(&utc("2024-03-05T10:00:00Z")));
        assert!(!spec.matches(&utc("2024-03-06T00:00:00Z")));
    }

    #[test]
    fn test_should_match_single_day_ignoring_time_components() {
        // A time-of-day in the input still matches by calendar day.
        let spec = DateSpec::parse("2024-03-05-23-59-59").unwrap();
        assert!(spec.matches(&utc("2024-03-05T00:00:01Z")));
    }

    #[test]
    fn test_should_match_interval_inclusively() {
        let spec = DateSpec::parse_range("2024-01-01", "2024-12-31").unwrap();
        assert!(spec.matches(&utc("2024-06-15T12:00:00Z")));
        assert!(spec.matches(&utc("2024-01-01T00:00:00Z")));
        assert!(!spec.matches(&utc("2023-12-31T23:59:59Z")));
    }

    #[test]
    fn test_should_match_interval_at_full_precision() {
        // The end bound is the parsed instant, not end-of-day.
        let spec = DateSpec::parse_range("2024-01-01", "2024-12-31").unwrap();
        assert!(!spec.matches(&utc("2024-12-31T00:00:01Z")));
    }

    #[test]
    fn test_should_borrow_candidate_timezone_for_floating_endpoints() {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        // 2024-03-05T01:00+05:00 is 2024-03-04T20:00 UTC; in the candidate's
        // own frame the calendar date is still the 5th.
        let created = offset.with_ymd_and_hms(2024, 3, 5, 1, 0, 0).unwrap();
        let spec = DateSpec::parse("2024-03-05").unwrap();
        assert!(spec.matches(&created));
        assert!(!DateSpec::parse("2024-03-04").unwrap().matches(&created));
    }

    #[test]
    fn test_should_keep_aware_endpoint_frame() {
        let spec = DateSpec::on(utc("2024-03-05T12:00:00Z"));
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        // Candidate's local date is the 6th, but only its own frame counts
        // for its side of the comparison; the aware endpoint stays on the 5th.
        let created = offset.with_ymd_and_hms(2024, 3, 6, 1, 0, 0).unwrap();
        assert!(!spec.matches(&created));
    }

    #[test]
    fn test_should_convert_calendar_date_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let spec = DateSpec::between(date, utc("2024-06-20T00:00:00Z")).unwrap();
        assert!(spec.matches(&utc("2024-06-15T00:00:00Z")));
        assert!(!spec.matches(&utc("2024-06-14T23:59:59Z")));
    }
}
