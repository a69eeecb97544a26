//! Timezone resolution and UTC conversion for iCalendar date-times.
//!
//! TZIDs are resolved against the IANA database shipped with `chrono-tz`.
//! Vendor prefixes are stripped and Windows zone names are mapped with ICU4X
//! first.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::str::FromStr;

/// Error during timezone conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Non-existent time during DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// Normalizes common CalDAV/iCalendar timezone identifiers to IANA names.
///
/// Windows zone names are mapped through ICU4X and IANA aliases are
/// canonicalized (`Europe/Kiev` becomes `Europe/Kyiv`). Unrecognized names are
/// returned with vendor prefixes stripped.
#[must_use]
pub fn normalize_tzid(tzid: &str) -> String {
    let trimmed = tzid.trim();
    let stripped = trimmed
        .strip_prefix("/mozilla.org/")
        .or_else(|| trimmed.strip_prefix("/softwarestudio.org/"))
        .map_or(trimmed, |rest| {
            // "/mozilla.org/20050126_1/America/New_York"
            rest.split_once('/')
                .filter(|(version, _)| version.starts_with(|c: char| c.is_ascii_digit()))
                .map_or(rest, |(_, name)| name)
        });

    let iana_parser = IanaParserExtended::new();

    if let Some(tz) = WindowsParser::new().parse(stripped, None)
        && let Some(entry) = iana_parser.iter().find(|entry| entry.time_zone == tz)
    {
        return entry.canonical.to_string();
    }

    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}

/// ## Summary
/// Resolves a timezone identifier to a `chrono_tz::Tz`.
///
/// ## Errors
/// Returns `ConversionError::UnknownTimezone` if the TZID cannot be resolved.
pub fn resolve_tzid(tzid: &str) -> Result<Tz, ConversionError> {
    let normalized = normalize_tzid(tzid);
    Tz::from_str(&normalized)
        .or_else(|_e| Tz::from_str(tzid.trim()))
        .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))
}

/// ## Summary
/// Converts a local datetime to UTC in the given zone.
///
/// DST folds resolve to the first occurrence (RFC 5545 §3.3.5).
///
/// ## Errors
/// Returns `ConversionError::NonExistentTime` for times inside a DST gap.
pub fn convert_to_utc(
    local_time: NaiveDateTime,
    tz: Tz,
) -> Result<DateTime<Utc>, ConversionError> {
    match tz.from_local_datetime(&local_time) {
        LocalResult::None => Err(ConversionError::NonExistentTime(format!(
            "{local_time} in timezone {tz}"
        ))),
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
    }
}

/// ## Summary
/// Converts a local datetime to UTC, shifting times inside a DST gap forward
/// by one hour instead of failing.
///
/// ## Errors
/// Returns an error if the shifted time still does not exist in the zone.
pub fn convert_to_utc_lenient(
    local_time: NaiveDateTime,
    tz: Tz,
) -> Result<DateTime<Utc>, ConversionError> {
    match convert_to_utc(local_time, tz) {
        Err(ConversionError::NonExistentTime(_)) => {
            convert_to_utc(local_time + chrono::Duration::hours(1), tz)
        }
        other => other,
    }
}
