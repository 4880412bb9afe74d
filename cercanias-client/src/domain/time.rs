//! Service times for timetable data.
//!
//! The API reports departure and arrival times as "HH:MM:SS" strings measured
//! from the start of the service day. Like GTFS, a trip that runs past
//! midnight keeps counting hours ("24:10:00", "25:05:00"), so the hour field
//! is not capped at 23.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

/// Error returned when parsing an invalid service time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid service time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A time of day within a service day, with one-second resolution.
///
/// # Examples
///
/// ```
/// use cercanias_client::domain::ServiceTime;
///
/// let time = ServiceTime::parse("08:08:00").unwrap();
/// assert_eq!(time.to_hhmm(), "08:08");
/// assert_eq!(time.to_string(), "08:08:00");
///
/// // After-midnight trips keep counting hours
/// assert!(ServiceTime::parse("24:15:00").is_ok());
///
/// // Invalid formats
/// assert!(ServiceTime::parse("08:08").is_err());
/// assert!(ServiceTime::parse("8:08:00").is_err());
/// assert!(ServiceTime::parse("08:60:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTime {
    secs: u32,
}

impl ServiceTime {
    /// Parse a time from "HH:MM:SS" format.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        // Must be exactly 8 characters: HH:MM:SS
        if s.len() != 8 {
            return Err(TimeError::new(s, "expected HH:MM:SS format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(TimeError::new(s, "expected colons at positions 2 and 5"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new(s, "invalid hour digits"))?;

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new(s, "invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new(s, "minute must be 0-59"));
        }

        let second = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| TimeError::new(s, "invalid second digits"))?;
        if second > 59 {
            return Err(TimeError::new(s, "second must be 0-59"));
        }

        Ok(Self {
            secs: hour * 3600 + minute * 60 + second,
        })
    }

    /// Create a service time from hours, minutes and seconds.
    ///
    /// Returns `None` if minutes or seconds are out of range.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if minute > 59 || second > 59 {
            return None;
        }
        let secs = hour.checked_mul(3600)?.checked_add(minute * 60 + second)?;
        Some(Self { secs })
    }

    /// Seconds since the start of the service day.
    pub fn seconds_from_midnight(&self) -> u32 {
        self.secs
    }

    /// Returns the hour, which may be 24 or more for after-midnight trips.
    pub fn hour(&self) -> u32 {
        self.secs / 3600
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        (self.secs % 3600) / 60
    }

    /// Returns the second (0-59).
    pub fn second(&self) -> u32 {
        self.secs % 60
    }

    /// Display form without seconds ("HH:MM").
    pub fn to_hhmm(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// Whole minutes from `self` until `later`, truncated toward zero.
    ///
    /// Plain same-day arithmetic: negative if `later` is earlier.
    pub fn minutes_until(&self, later: Self) -> i64 {
        (i64::from(later.secs) - i64::from(self.secs)) / 60
    }

    /// Place this time on a calendar date.
    ///
    /// Hours past 23 land on the following day(s).
    ///
    /// ```
    /// use cercanias_client::domain::ServiceTime;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let late = ServiceTime::parse("24:30:00").unwrap();
    /// let dt = late.on(date).unwrap();
    /// assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    /// assert_eq!(dt.format("%H:%M").to_string(), "00:30");
    /// ```
    pub fn on(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        date.and_hms_opt(0, 0, 0)?
            .checked_add_signed(Duration::seconds(i64::from(self.secs)))
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = ServiceTime::parse("07:35:00").unwrap();
        assert_eq!(t.hour(), 7);
        assert_eq!(t.minute(), 35);
        assert_eq!(t.second(), 0);

        assert!(ServiceTime::parse("00:00:00").is_ok());
        assert!(ServiceTime::parse("23:59:59").is_ok());
        assert!(ServiceTime::parse("27:10:00").is_ok());
    }

    #[test]
    fn reject_malformed_times() {
        assert!(ServiceTime::parse("").is_err());
        assert!(ServiceTime::parse("0735").is_err());
        assert!(ServiceTime::parse("07:35").is_err());
        assert!(ServiceTime::parse("07-35-00").is_err());
        assert!(ServiceTime::parse("ab:cd:ef").is_err());
        assert!(ServiceTime::parse("07:35:60").is_err());
        assert!(ServiceTime::parse(" 7:35:00").is_err());
    }

    #[test]
    fn error_mentions_input() {
        let err = ServiceTime::parse("7:5").unwrap_err();
        assert!(err.to_string().contains("\"7:5\""));
    }

    #[test]
    fn hhmm_formatting() {
        assert_eq!(ServiceTime::parse("08:08:00").unwrap().to_hhmm(), "08:08");
        assert_eq!(ServiceTime::parse("23:59:59").unwrap().to_hhmm(), "23:59");
    }

    #[test]
    fn display_keeps_seconds() {
        let t = ServiceTime::parse("25:01:02").unwrap();
        assert_eq!(t.to_string(), "25:01:02");
        assert_eq!(format!("{t:?}"), "ServiceTime(25:01:02)");
    }

    #[test]
    fn minutes_until() {
        let dep = ServiceTime::parse("07:35:00").unwrap();
        let arr = ServiceTime::parse("08:08:00").unwrap();
        assert_eq!(dep.minutes_until(arr), 33);
        assert_eq!(arr.minutes_until(dep), -33);

        // Partial minutes are truncated
        let arr = ServiceTime::parse("08:08:59").unwrap();
        assert_eq!(dep.minutes_until(arr), 33);
    }

    #[test]
    fn from_hms_validates() {
        assert_eq!(
            ServiceTime::from_hms(7, 35, 0),
            Some(ServiceTime::parse("07:35:00").unwrap())
        );
        assert!(ServiceTime::from_hms(7, 60, 0).is_none());
        assert!(ServiceTime::from_hms(7, 0, 60).is_none());
    }

    #[test]
    fn on_date_same_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dt = ServiceTime::parse("07:35:00").unwrap().on(date).unwrap();
        assert_eq!(dt, date.and_hms_opt(7, 35, 0).unwrap());
    }

    #[test]
    fn ordering_follows_service_day() {
        let a = ServiceTime::parse("23:50:00").unwrap();
        let b = ServiceTime::parse("24:05:00").unwrap();
        assert!(a < b);
    }
}
