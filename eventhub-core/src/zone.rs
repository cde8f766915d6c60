//! Calendar-day normalization in one canonical timezone.
//!
//! Events are stored as UTC instants. Every date comparison goes through
//! [`CalendarZone::day_of`], so an event and a query date are compared as
//! wall-clock days in the same zone and never as raw instants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{HubError, HubResult, ValidationError};

const DAY_FORMAT: &str = "%B %-d, %Y";
const WHEN_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

/// Naive forms accepted for draft dates, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarZone(Tz);

impl Default for CalendarZone {
    fn default() -> Self {
        CalendarZone(Tz::UTC)
    }
}

impl CalendarZone {
    /// Look up an IANA zone name such as `Europe/Berlin`.
    pub fn from_name(name: &str) -> HubResult<Self> {
        Tz::from_str(name)
            .map(CalendarZone)
            .map_err(|_| HubError::Config(format!("Unknown timezone '{name}'")))
    }

    /// The calendar day an instant falls on in this zone.
    pub fn day_of(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// First instant of `day` in this zone.
    ///
    /// When midnight falls into a DST gap the first valid instant after it is used.
    pub fn start_of_day(&self, day: NaiveDate) -> Option<DateTime<Utc>> {
        let midnight = day.and_hms_opt(0, 0, 0)?;
        self.resolve_local(midnight)
            .or_else(|| self.resolve_local(midnight + chrono::Duration::hours(1)))
    }

    /// Parse draft date text into an instant.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` and bare `YYYY-MM-DD`.
    /// Forms without an offset are wall-clock times in this zone.
    pub fn parse_instant(&self, input: &str) -> Result<DateTime<Utc>, ValidationError> {
        let s = input.trim();
        let invalid = || ValidationError::InvalidDate(input.to_string());

        if s.is_empty() {
            return Err(invalid());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return self.resolve_local(naive).ok_or_else(invalid);
            }
        }

        if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return self.start_of_day(day).ok_or_else(invalid);
        }

        Err(invalid())
    }

    /// Long-form day, e.g. "March 20, 2025".
    pub fn format_day(&self, day: NaiveDate) -> String {
        day.format(DAY_FORMAT).to_string()
    }

    /// Long-form local time of an instant, e.g. "March 20, 2025 at 3:00 PM".
    pub fn format_when(&self, instant: &DateTime<Utc>) -> String {
        instant.with_timezone(&self.0).format(WHEN_FORMAT).to_string()
    }

    /// Render an instant the way a `datetime-local` input shows it.
    pub fn format_input(&self, instant: &DateTime<Utc>) -> String {
        instant.with_timezone(&self.0).format("%Y-%m-%dT%H:%M").to_string()
    }

    fn resolve_local(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.0.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => None,
        }
    }
}

impl fmt::Display for CalendarZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn berlin() -> CalendarZone {
        CalendarZone::from_name("Europe/Berlin").unwrap()
    }

    #[test]
    fn day_of_uses_zone_not_utc() {
        // 23:30 UTC on March 19 is already March 20 in Berlin
        let instant = Utc.with_ymd_and_hms(2025, 3, 19, 23, 30, 0).unwrap();
        assert_eq!(
            CalendarZone::default().day_of(&instant),
            NaiveDate::from_ymd_opt(2025, 3, 19).unwrap()
        );
        assert_eq!(berlin().day_of(&instant), NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
    }

    #[test]
    fn same_day_compares_calendar_days() {
        let zone = CalendarZone::default();
        let morning = Utc.with_ymd_and_hms(2025, 3, 20, 0, 5, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2025, 3, 20, 23, 55, 0).unwrap();
        let next = Utc.with_ymd_and_hms(2025, 3, 21, 0, 0, 0).unwrap();
        assert_eq!(zone.day_of(&morning), zone.day_of(&night));
        assert_ne!(zone.day_of(&night), zone.day_of(&next));
    }

    #[test]
    fn parse_rfc3339() {
        let dt = CalendarZone::default().parse_instant("2025-03-20T15:00:00+01:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 20, 14, 0, 0).unwrap());
    }

    #[test]
    fn parse_datetime_local_in_zone() {
        let dt = berlin().parse_instant("2025-03-20T15:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 20, 14, 0, 0).unwrap());
    }

    #[test]
    fn parse_bare_date_is_start_of_day() {
        let dt = berlin().parse_instant("2025-07-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 30, 22, 0, 0).unwrap());
    }

    #[test]
    fn parse_rejects_garbage_and_blank() {
        let zone = CalendarZone::default();
        assert_eq!(
            zone.parse_instant("next tuesday"),
            Err(ValidationError::InvalidDate("next tuesday".into()))
        );
        assert!(zone.parse_instant("   ").is_err());
        assert!(zone.parse_instant("2025-02-30").is_err());
    }

    #[test]
    fn parse_rejects_time_in_dst_gap() {
        // Clocks jump from 02:00 to 03:00 in Berlin on 2025-03-30
        assert!(berlin().parse_instant("2025-03-30T02:30").is_err());
    }

    #[test]
    fn unknown_zone_is_config_error() {
        assert!(matches!(CalendarZone::from_name("Mars/Olympus"), Err(HubError::Config(_))));
    }

    #[test]
    fn formats() {
        let zone = CalendarZone::default();
        let dt = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        assert_eq!(zone.format_when(&dt), "March 20, 2025 at 3:00 PM");
        assert_eq!(zone.format_day(zone.day_of(&dt)), "March 20, 2025");
        assert_eq!(zone.format_input(&dt), "2025-03-20T15:00");
    }
}
