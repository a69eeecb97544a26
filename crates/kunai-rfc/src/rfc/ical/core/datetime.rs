//! iCalendar DATE and DATE-TIME value types (RFC 5545 §3.3.4, §3.3.5).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::rfc::ical::expand::{ConversionError, convert_to_utc_lenient, resolve_tzid};

/// Form of DATE-TIME value (RFC 5545 §3.3.5).
///
/// iCalendar DATE-TIME values come in three mutually exclusive forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeForm {
    /// Floating time - same wall-clock time in any timezone.
    ///
    /// Example: `19980118T230000`
    Floating,

    /// UTC time - absolute instant, indicated by 'Z' suffix.
    ///
    /// Example: `19980119T070000Z`
    Utc,

    /// Local time with a timezone reference.
    ///
    /// Example: `DTSTART;TZID=America/New_York:19980119T020000`
    Zoned {
        /// Timezone identifier from the TZID parameter.
        tzid: String,
    },
}

/// A DATE-TIME value with its form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTime {
    /// Wall-clock date and time as written.
    pub local: NaiveDateTime,
    /// How the wall-clock time maps to an instant.
    pub form: DateTimeForm,
}

impl DateTime {
    /// Creates a floating date-time.
    #[must_use]
    pub const fn floating(local: NaiveDateTime) -> Self {
        Self {
            local,
            form: DateTimeForm::Floating,
        }
    }

    /// Creates a UTC date-time.
    #[must_use]
    pub const fn utc(local: NaiveDateTime) -> Self {
        Self {
            local,
            form: DateTimeForm::Utc,
        }
    }

    /// Creates a date-time bound to a TZID.
    #[must_use]
    pub fn zoned(local: NaiveDateTime, tzid: impl Into<String>) -> Self {
        Self {
            local,
            form: DateTimeForm::Zoned { tzid: tzid.into() },
        }
    }

    /// ## Summary
    /// Parses a DATE-TIME value.
    ///
    /// Format: `YYYYMMDD"T"HHMMSS[Z]`. A trailing `Z` wins over `tzid`.
    ///
    /// Returns `None` when the text is not a valid date-time.
    #[must_use]
    pub fn parse(s: &str, tzid: Option<&str>) -> Option<Self> {
        let (date_str, time_str) = s.split_once('T')?;
        let date = parse_date(date_str)?;

        let (time_str, is_utc) = match time_str.strip_suffix('Z') {
            Some(stripped) => (stripped, true),
            None => (time_str, false),
        };
        let time = parse_time(time_str)?;
        let local = NaiveDateTime::new(date, time);

        Some(match (is_utc, tzid) {
            (true, _) => Self::utc(local),
            (false, Some(tzid)) => Self::zoned(local, tzid),
            (false, None) => Self::floating(local),
        })
    }

    /// Returns the TZID if this is a zoned date-time.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match &self.form {
            DateTimeForm::Zoned { tzid } => Some(tzid),
            DateTimeForm::Floating | DateTimeForm::Utc => None,
        }
    }

    /// ## Summary
    /// Maps this value to an instant. Floating values are read as wall-clock
    /// time in `floating_tz`.
    ///
    /// ## Errors
    /// Returns an error if the TZID is unknown or the local time cannot be
    /// placed in its zone.
    pub fn to_utc(&self, floating_tz: Tz) -> Result<chrono::DateTime<Utc>, ConversionError> {
        match &self.form {
            DateTimeForm::Utc => Ok(self.local.and_utc()),
            DateTimeForm::Zoned { tzid } => convert_to_utc_lenient(self.local, resolve_tzid(tzid)?),
            DateTimeForm::Floating => convert_to_utc_lenient(self.local, floating_tz),
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local.format("%Y%m%dT%H%M%S"))?;
        if self.form == DateTimeForm::Utc {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

/// ## Summary
/// Parses a DATE value.
///
/// Format: `YYYYMMDD` (e.g., "19970714")
///
/// Returns `None` when the text is not a valid calendar date.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses a TIME value without the UTC designator.
fn parse_time(s: &str) -> Option<NaiveTime> {
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour = s[0..2].parse().ok()?;
    let minute = s[2..4].parse().ok()?;
    let second = s[4..6].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, second)
}
